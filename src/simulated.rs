use async_trait::async_trait;
use rand::Rng;
use rand::seq::SliceRandom;
use std::time::Duration;
use tokio::time::sleep;

use crate::config::SimulatedConfig;
use crate::error::Result;
use crate::models::Mode;
use crate::service::{ResponseService, validate_question};

const NORMAL_TEMPLATES: &[&str] = &[
    "Great question! \"{q}\" comes down to a few core ideas. Start with the definition, then look at how each part connects to the next. Once the building blocks are clear, the bigger picture follows naturally.",
    "Let's break down \"{q}\". First, identify the key terms. Next, think about cause and effect. Finally, connect it to something you already know, which makes it much easier to remember.",
    "Here's how to think about \"{q}\": it is best understood by looking at what happens step by step and asking why each step matters. Try explaining it back in your own words to check your understanding.",
];

const SIMPLIFY_TEMPLATES: &[&str] = &[
    "Imagine you're telling a friend about \"{q}\". The simple version: it's like a recipe, where each step builds on the one before it until you get the final result.",
    "Think of \"{q}\" like building with blocks. Each block is a small idea, and when you stack them the right way you get the whole thing.",
];

const SUMMARIZE_TEMPLATES: &[&str] = &[
    "Summary of \"{q}\":\n- What it is: the core idea in one sentence\n- Why it matters: its main effect\n- Key takeaway: the one thing to remember",
    "In short, \"{q}\" is about one central idea, a handful of supporting facts, and a clear outcome. Focus on those three and you have the essentials.",
];

const QUIZ_TEMPLATES: &[&str] = &[
    "Quiz: \"{q}\"\n1. What is the main idea?\n2. Name one cause and one effect.\n3. How would you explain it to a classmate?\n\nAnswers: review your notes on the definition, the key cause/effect pair, and a simple analogy.",
];

/// Offline implementation: manufactures template text after an artificial
/// delay, without any network access.
pub struct SimulatedService {
    min_delay: Duration,
    max_delay: Duration,
    max_question_length: usize,
}

impl SimulatedService {
    pub fn new(min_delay: Duration, max_delay: Duration, max_question_length: usize) -> Self {
        Self {
            min_delay,
            max_delay: max_delay.max(min_delay),
            max_question_length,
        }
    }

    pub fn from_config(cfg: &SimulatedConfig, max_question_length: usize) -> Self {
        Self::new(
            Duration::from_millis(cfg.min_delay_ms),
            Duration::from_millis(cfg.max_delay_ms),
            max_question_length,
        )
    }

    fn pick_delay(&self) -> Duration {
        let min = self.min_delay.as_millis() as u64;
        let max = self.max_delay.as_millis() as u64;
        Duration::from_millis(rand::thread_rng().gen_range(min..=max))
    }
}

fn templates_for(mode: Option<Mode>) -> &'static [&'static str] {
    match mode {
        Some(Mode::Simplify) => SIMPLIFY_TEMPLATES,
        Some(Mode::Summarize) => SUMMARIZE_TEMPLATES,
        Some(Mode::Quiz) => QUIZ_TEMPLATES,
        None => NORMAL_TEMPLATES,
    }
}

#[async_trait]
impl ResponseService for SimulatedService {
    async fn generate_response(&self, question: &str, mode: Option<Mode>) -> Result<String> {
        validate_question(question, self.max_question_length)?;

        let delay = self.pick_delay();
        tracing::debug!("Simulating response in {} ms", delay.as_millis());
        sleep(delay).await;

        let template = templates_for(mode)
            .choose(&mut rand::thread_rng())
            .copied()
            .unwrap_or("{q}");
        Ok(template.replace("{q}", question.trim()))
    }
}
