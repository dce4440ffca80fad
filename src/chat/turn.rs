//! A single request/response exchange with the active model.

use std::time::{Duration, Instant};

use futures::StreamExt;
use thiserror::Error;

use crate::message::Message;
use crate::output::Renderer;
use crate::provider::{ProviderError, ProviderFactory};
use crate::session::Session;
use crate::tokens;

/// Result of a completed turn.
#[derive(Debug, Clone)]
pub struct TurnReport {
    pub cost: Option<f64>,
    pub elapsed: Duration,
}

#[derive(Debug, Error)]
pub enum TurnError {
    #[error("Provider for '{0}' not found.")]
    UnknownProvider(String),

    #[error(transparent)]
    Provider(#[from] ProviderError),
}

/// Sends `prompt` to `model_id` and streams the reply into `renderer`.
///
/// The session gains the user and assistant messages only if the whole
/// exchange succeeds. On failure it is truncated back to its prior length and
/// whatever was already rendered stays on screen.
pub async fn run_turn<R: Renderer>(
    session: &mut Session,
    factory: &ProviderFactory,
    model_id: &str,
    prompt: &str,
    renderer: &mut R,
) -> Result<TurnReport, TurnError> {
    let Some((provider, model)) = factory.resolve(model_id) else {
        let err = TurnError::UnknownProvider(model_id.to_string());
        renderer.render_error(&err.to_string());
        return Err(err);
    };

    let started = Instant::now();
    let before = session.len();
    session.push(Message::user(prompt));
    let prompt_tokens = tokens::count_tokens(prompt);

    match stream_reply(session, provider, model, renderer).await {
        Ok(response) => {
            renderer.render_done();
            let completion_tokens = tokens::count_tokens(&response);
            let cost = provider.calculate_cost(prompt_tokens, completion_tokens, model);
            session.push(Message::assistant(response));
            session.add_cost(cost);
            tracing::debug!(
                model = model_id,
                prompt_tokens,
                completion_tokens,
                ?cost,
                "turn complete"
            );
            Ok(TurnReport {
                cost,
                elapsed: started.elapsed(),
            })
        }
        Err(e) => {
            session.rollback_to(before);
            renderer.render_error(&e.to_string());
            Err(e.into())
        }
    }
}

async fn stream_reply<R: Renderer>(
    session: &Session,
    provider: &crate::provider::Provider,
    model: &str,
    renderer: &mut R,
) -> Result<String, ProviderError> {
    let mut stream = provider.stream_chat(&session.messages, model).await?;
    let mut response = String::new();
    while let Some(fragment) = stream.next().await {
        let fragment = fragment?;
        renderer.render_token(&fragment);
        response.push_str(&fragment);
    }
    Ok(response)
}
