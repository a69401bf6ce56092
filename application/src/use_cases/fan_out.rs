//! Parallel fan-out of one prompt to many models.
//!
//! Every model is queried concurrently on a [`JoinSet`]. A failing model
//! never affects the others; its error is returned in its slot.

use crate::ports::llm_gateway::{GatewayError, LlmGateway, ModelReply, QueryOptions};
use crate::ports::progress::{NoProgress, ProgressNotifier};
use council_domain::{ChatMessage, ModelId, Stage};
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{debug, warn};

/// Outcome of one model's request
pub type FanOutResult = (ModelId, Result<ModelReply, GatewayError>);

/// Query every model with the same messages, without progress reporting.
///
/// Results are returned in the order of `models`, one entry per model.
/// Use [`query_all_with_progress`] to report settled requests for a stage.
pub async fn query_all<G: LlmGateway + 'static>(
    gateway: &Arc<G>,
    models: &[ModelId],
    messages: &[ChatMessage],
    options: &QueryOptions,
) -> Vec<FanOutResult> {
    query_all_with_progress(gateway, models, messages, options, Stage::One, &NoProgress).await
}

/// [`query_all`] reporting each settled request to `progress` as it arrives.
pub async fn query_all_with_progress<G: LlmGateway + 'static>(
    gateway: &Arc<G>,
    models: &[ModelId],
    messages: &[ChatMessage],
    options: &QueryOptions,
    stage: Stage,
    progress: &dyn ProgressNotifier,
) -> Vec<FanOutResult> {
    debug!(
        "Fanning out {} message(s) to {} models",
        messages.len(),
        models.len()
    );

    let messages: Arc<[ChatMessage]> = Arc::from(messages);
    let mut join_set = JoinSet::new();

    for (index, model) in models.iter().enumerate() {
        let gateway = Arc::clone(gateway);
        let messages = Arc::clone(&messages);
        let model = model.clone();
        let options = options.clone();

        join_set.spawn(async move {
            let result = gateway.query(&model, &messages, &options).await;
            (index, result)
        });
    }

    let mut slots: Vec<Option<Result<ModelReply, GatewayError>>> =
        models.iter().map(|_| None).collect();

    while let Some(joined) = join_set.join_next().await {
        match joined {
            Ok((index, result)) => {
                let model = &models[index];
                match &result {
                    Ok(_) => debug!("Model {} responded", model),
                    Err(e) => warn!("Model {} failed: {}", model, e),
                }
                progress.on_task_complete(stage, model, result.is_ok());
                slots[index] = Some(result);
            }
            Err(e) => {
                warn!("Task join error: {}", e);
            }
        }
    }

    models
        .iter()
        .cloned()
        .zip(slots)
        .map(|(model, slot)| {
            let result = slot.unwrap_or_else(|| {
                progress.on_task_complete(stage, &model, false);
                Err(GatewayError::TaskFailed(format!(
                    "query task for {} did not complete",
                    model
                )))
            });
            (model, result)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::use_cases::test_support::ScriptedGateway;
    use std::sync::Mutex;
    use std::time::Duration;

    fn models(ids: &[&str]) -> Vec<ModelId> {
        ids.iter().map(|id| ModelId::from(*id)).collect()
    }

    #[tokio::test]
    async fn test_results_follow_input_order() {
        // Slower replies for earlier models; output order must not change
        let gateway = Arc::new(ScriptedGateway::new(|model, _| {
            Ok(ModelReply::text(format!("from {}", model)))
        })
        .with_delay("m/a", Duration::from_millis(30))
        .with_delay("m/b", Duration::from_millis(10)));

        let models = models(&["m/a", "m/b", "m/c"]);
        let results = query_all(
            &gateway,
            &models,
            &[ChatMessage::user("hi")],
            &QueryOptions::default(),
        )
        .await;

        let order: Vec<_> = results.iter().map(|(m, _)| m.as_str()).collect();
        assert_eq!(order, vec!["m/a", "m/b", "m/c"]);
        assert_eq!(results[1].1.as_ref().unwrap().content, "from m/b");
    }

    #[tokio::test]
    async fn test_partial_failure_is_isolated() {
        let gateway = Arc::new(ScriptedGateway::new(|model, _| {
            if model.as_str() == "m/bad" {
                Err(GatewayError::Timeout)
            } else {
                Ok(ModelReply::text("ok"))
            }
        }));

        let models = models(&["m/good", "m/bad"]);
        let results = query_all(
            &gateway,
            &models,
            &[ChatMessage::user("hi")],
            &QueryOptions::default(),
        )
        .await;

        assert!(results[0].1.is_ok());
        assert!(matches!(results[1].1, Err(GatewayError::Timeout)));
        assert_eq!(gateway.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_panicking_task_becomes_failure() {
        let gateway = Arc::new(ScriptedGateway::new(|model, _| {
            if model.as_str() == "m/panic" {
                panic!("adapter bug");
            }
            Ok(ModelReply::text("ok"))
        }));

        let models = models(&["m/panic", "m/fine"]);
        let results = query_all(
            &gateway,
            &models,
            &[ChatMessage::user("hi")],
            &QueryOptions::default(),
        )
        .await;

        assert!(matches!(results[0].1, Err(GatewayError::TaskFailed(_))));
        assert!(results[1].1.is_ok());
    }

    #[derive(Default)]
    struct RecordingProgress {
        completed: Mutex<Vec<(Stage, String, bool)>>,
    }

    impl ProgressNotifier for RecordingProgress {
        fn on_stage_start(&self, _stage: Stage, _total_tasks: usize) {}

        fn on_task_complete(&self, stage: Stage, model: &ModelId, success: bool) {
            self.completed
                .lock()
                .unwrap()
                .push((stage, model.to_string(), success));
        }

        fn on_stage_complete(&self, _stage: Stage) {}
    }

    #[tokio::test]
    async fn test_progress_reports_the_given_stage() {
        let gateway = Arc::new(ScriptedGateway::new(|model, _| {
            if model.as_str() == "m/bad" {
                Err(GatewayError::Timeout)
            } else {
                Ok(ModelReply::text("ok"))
            }
        }));
        let progress = RecordingProgress::default();

        query_all_with_progress(
            &gateway,
            &models(&["m/good", "m/bad"]),
            &[ChatMessage::user("hi")],
            &QueryOptions::default(),
            Stage::Two,
            &progress,
        )
        .await;

        let mut completed = progress.completed.lock().unwrap().clone();
        completed.sort_by(|a, b| a.1.cmp(&b.1));
        assert_eq!(
            completed,
            vec![
                (Stage::Two, "m/bad".to_string(), false),
                (Stage::Two, "m/good".to_string(), true),
            ]
        );
    }

    #[tokio::test]
    async fn test_empty_model_list() {
        let gateway = Arc::new(ScriptedGateway::new(|_, _| Ok(ModelReply::text("x"))));
        let results = query_all(&gateway, &[], &[], &QueryOptions::default()).await;
        assert!(results.is_empty());
    }
}
