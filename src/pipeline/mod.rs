//! The three-stage shoot planner: detect, suggest ideas, build prompts.
//!
//! Stages 1 and 2 run back to back for one upload; their combined result is
//! written to the session store as a single [`PlanningSession`] only after
//! both succeed. Stage 3 reads that session by id.

pub mod rules;
pub mod types;

use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};

use crate::llm::{extract_as, ChatMessage, Dispatcher, ExtractError, LlmError, ModelRequest};
use crate::prompts::{
    StyleTemplate, DETECT_SYSTEM_PROMPT, DETECT_USER_PROMPT, IDEAS_SYSTEM_PROMPT,
    PROMPTS_SYSTEM_PROMPT, STYLE_TEMPLATES,
};
use crate::session::SessionStore;

use rules::{idea_instructions, prompt_instructions, IdeaContext, PromptContext};
pub use types::{DetectionOutcome, Idea, PlanningSession, ProductDetection, ShotPrompt};
use types::{normalize_idea_ids, reindex_shots, IdeaList, ShotList};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("{0}")]
    NotFound(String),

    #[error("processing error: {0}")]
    Extract(#[from] ExtractError),

    #[error(transparent)]
    Llm(#[from] LlmError),
}

/// Optional inputs for idea generation.
#[derive(Debug, Clone, Default)]
pub struct IdeaOptions {
    pub style: Option<String>,
    pub platform: Option<String>,
    pub include_model: Option<bool>,
}

pub struct ShootPlanner {
    dispatcher: Dispatcher,
    sessions: Arc<SessionStore<PlanningSession>>,
}

impl ShootPlanner {
    pub fn new(dispatcher: Dispatcher, sessions: Arc<SessionStore<PlanningSession>>) -> Self {
        Self {
            dispatcher,
            sessions,
        }
    }

    pub fn sessions(&self) -> &SessionStore<PlanningSession> {
        &self.sessions
    }

    pub fn styles(&self) -> &'static [StyleTemplate] {
        STYLE_TEMPLATES
    }

    /// Stage 1: identify the product in an image given as a data URL.
    pub async fn detect(&self, image_data_url: &str) -> Result<ProductDetection, PipelineError> {
        let request = ModelRequest::new(vec![
            ChatMessage::system(DETECT_SYSTEM_PROMPT),
            ChatMessage::user_with_image(DETECT_USER_PROMPT, image_data_url),
        ]);
        let completion = self.dispatcher.complete(request, "detect_product").await?;
        let detection: ProductDetection = extract_as(&completion.text)?;
        info!(
            "Detected product '{}' (category='{}', confidence={}, model={}, fell_back={})",
            detection.product,
            detection.category,
            detection.confidence,
            completion.model,
            completion.fell_back
        );
        Ok(detection)
    }

    /// Stage 2: propose shoot concepts for a detected product.
    pub async fn suggest_ideas(
        &self,
        product: &str,
        category: &str,
        attributes: &[String],
        options: &IdeaOptions,
    ) -> Result<Vec<Idea>, PipelineError> {
        let instructions = idea_instructions(&IdeaContext {
            product,
            category,
            attributes,
            style: options.style.as_deref(),
            platform: options.platform.as_deref(),
            include_model: options.include_model,
        });
        let request = ModelRequest::new(vec![
            ChatMessage::system(IDEAS_SYSTEM_PROMPT),
            ChatMessage::user(instructions),
        ]);
        let completion = self.dispatcher.complete(request, "suggest_ideas").await?;
        let IdeaList { mut ideas } = extract_as(&completion.text)?;
        if ideas.is_empty() {
            warn!("Idea generation for '{product}' returned no ideas");
        }
        normalize_idea_ids(&mut ideas);
        info!(
            "Generated {} idea(s) for '{}' (model={}, fell_back={})",
            ideas.len(),
            product,
            completion.model,
            completion.fell_back
        );
        Ok(ideas)
    }

    /// Stage 3: detailed shot prompts for one idea. Returns at most `count`
    /// shots, indexed from 1.
    pub async fn build_prompts(
        &self,
        session: &PlanningSession,
        idea: &Idea,
        count: usize,
        model_override: Option<String>,
    ) -> Result<Vec<ShotPrompt>, PipelineError> {
        let instructions = prompt_instructions(&PromptContext {
            product: &session.product,
            category: &session.category,
            idea,
            count,
            style: session.style.as_deref(),
            platform: session.platform.as_deref(),
            include_model: session.include_model,
        });
        let request = ModelRequest::new(vec![
            ChatMessage::system(PROMPTS_SYSTEM_PROMPT),
            ChatMessage::user(instructions),
        ])
        .with_model(model_override);
        let completion = self.dispatcher.complete(request, "build_prompts").await?;
        let ShotList { mut shots } = extract_as(&completion.text)?;

        if shots.len() > count {
            warn!(
                "Model returned {} shots for a request of {}; keeping the first {}",
                shots.len(),
                count,
                count
            );
            shots.truncate(count);
        } else if shots.len() < count {
            warn!("Model returned {} of {} requested shots", shots.len(), count);
        }
        reindex_shots(&mut shots);

        info!(
            "Built {} shot prompt(s) for idea {} (model={}, fell_back={})",
            shots.len(),
            idea.id,
            completion.model,
            completion.fell_back
        );
        Ok(shots)
    }

    /// Stages 1 and 2, then one session write holding the combined result.
    pub async fn detect_and_suggest(
        &self,
        image_data_url: &str,
        options: IdeaOptions,
    ) -> Result<DetectionOutcome, PipelineError> {
        let detection = self.detect(image_data_url).await?;
        let ideas = self
            .suggest_ideas(
                &detection.product,
                &detection.category,
                &detection.attributes,
                &options,
            )
            .await?;

        let session_id = self.sessions.create(PlanningSession {
            product: detection.product.clone(),
            category: detection.category.clone(),
            attributes: detection.attributes.clone(),
            ideas: ideas.clone(),
            style: options.style,
            platform: options.platform,
            include_model: options.include_model,
        });

        Ok(DetectionOutcome {
            session_id,
            detection,
            ideas,
        })
    }

    /// Stage 3 against a stored session. Unknown or expired sessions and idea
    /// ids missing from the session are `NotFound`.
    pub async fn plan(
        &self,
        session_id: &str,
        idea_id: &str,
        count: usize,
        model_override: Option<String>,
    ) -> Result<Vec<ShotPrompt>, PipelineError> {
        let session = self.sessions.get(session_id.trim()).ok_or_else(|| {
            PipelineError::NotFound(format!(
                "Session {session_id} not found or expired; upload the image again to start over"
            ))
        })?;
        let idea = session.find_idea(idea_id).cloned().ok_or_else(|| {
            PipelineError::NotFound(format!(
                "Idea {idea_id} not found in session {session_id}"
            ))
        })?;
        self.build_prompts(&session, &idea, count, model_override)
            .await
    }
}
