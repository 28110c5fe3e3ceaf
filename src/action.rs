//! End-to-end run of the step: configuration in, published status out.

use tracing::info;

use crate::config::ReviewAppConfig;
use crate::error::ReviewAppError;
use crate::github::{EventSource, OctocrabSourceControlGateway, PullRequestEvent};
use crate::heroku::HerokuGateway;
use crate::output::ActionOutput;
use crate::reconciler::{ReconcileOutcome, ReconcilerSettings, ReviewAppReconciler};

/// Name of the step output carrying the deployment status.
pub const STATUS_OUTPUT: &str = "status";

/// Loads the event, reconciles the review app, and publishes `status`.
///
/// Skipped runs publish nothing.
///
/// # Errors
///
/// Returns configuration and payload errors as well as every gateway failure
/// the reconciler propagates.
pub async fn run(config: &ReviewAppConfig) -> Result<ReconcileOutcome, ReviewAppError> {
    let source = EventSource::from_event_name(&config.resolve_event_name()?)?;
    let event = PullRequestEvent::load(source, &config.resolve_event_path()?)?;
    info!(
        event = source.as_str(),
        action = ?event.action,
        pr = %event.number,
        branch = %event.head_branch,
        fork = event.is_fork(),
        "loaded pull request event"
    );

    let actor = config
        .resolve_actor()
        .or_else(|| event.sender.clone())
        .ok_or(ReviewAppError::MissingSetting {
            name: "actor (GITHUB_ACTOR)",
        })?;
    let github_api_url = config.resolve_github_api_url()?;

    let settings = ReconcilerSettings {
        pipeline: config.resolve_pipeline_id()?,
        allowed_permissions: config.resolve_allowed_permissions()?,
        trigger_label: config.trigger_label().to_owned(),
        actor,
        archive_api_base: github_api_url.clone(),
        archive_token: config.resolve_archive_token()?,
    };

    let source_control = OctocrabSourceControlGateway::for_token(
        &config.resolve_github_token()?,
        github_api_url.as_str().trim_end_matches('/'),
    )?;
    let platform = HerokuGateway::new(
        &config.resolve_heroku_token()?,
        config.heroku_api_url(),
        config.request_timeout(),
    )?;

    let outcome = ReviewAppReconciler::new(&source_control, &platform, &settings)
        .reconcile(&event)
        .await?;

    match outcome {
        ReconcileOutcome::Completed(decision) => {
            ActionOutput::from_path(config.resolve_output_path())
                .publish(STATUS_OUTPUT, decision.status.as_str())?;
            info!(status = %decision.status, "action complete");
        }
        ReconcileOutcome::Skipped(reason) => {
            info!(?reason, "action complete without deployment");
        }
    }

    Ok(outcome)
}
