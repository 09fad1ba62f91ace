//! Prompt composition and insight synthesis

use std::fmt::Write as _;
use std::sync::Arc;
use std::time::Duration;

use tracing::warn;

use crate::domain::almanac::DailyContext;
use crate::domain::generation::TextGenerator;
use crate::domain::retrieval::{RetrievedItem, Topic};
use crate::domain::zodiac::ZodiacSign;

/// Composes one synthesis prompt from retrieved evidence and turns it into
/// insight text.
///
/// Never fails and never returns empty text: a failing or empty generator
/// degrades to a deterministic fallback parameterized by the user's name and
/// sign.
#[derive(Debug)]
pub struct SynthesisService {
    generator: Arc<dyn TextGenerator>,
    generation_timeout: Duration,
}

impl SynthesisService {
    pub fn new(generator: Arc<dyn TextGenerator>, generation_timeout: Duration) -> Self {
        Self {
            generator,
            generation_timeout,
        }
    }

    /// Renders the evidence block, one section per topic in topic-list order,
    /// items within a section ordered by descending relevance.
    fn format_evidence(items: &[RetrievedItem]) -> String {
        let mut block = String::new();

        for topic in Topic::ALL {
            let mut section: Vec<&RetrievedItem> =
                items.iter().filter(|i| i.topic == topic.as_str()).collect();
            if section.is_empty() {
                continue;
            }
            section.sort_by(|a, b| b.relevance_score().total_cmp(&a.relevance_score()));

            let _ = writeln!(
                block,
                "=== {} HOROSCOPES ===",
                topic.as_str().to_uppercase()
            );
            for item in section {
                let _ = writeln!(
                    block,
                    "[relevance {:.2}] {}",
                    item.relevance_score(),
                    item.text
                );
            }
            block.push('\n');
        }

        block
    }

    fn build_prompt(
        user_name: &str,
        sign: ZodiacSign,
        items: &[RetrievedItem],
        context: Option<&DailyContext>,
    ) -> String {
        let mut prompt = format!(
            "You are an experienced astrologer writing a daily horoscope.\n\
             The reader is {}, a {}.\n",
            user_name,
            sign.display_name()
        );

        if let Some(line) = context.and_then(DailyContext::prompt_line) {
            let _ = writeln!(prompt, "Today's almanac: {}.", line);
        }

        let evidence = Self::format_evidence(items);
        if !evidence.is_empty() {
            prompt.push_str("\nSource horoscopes, grouped by life area:\n\n");
            prompt.push_str(&evidence);
        }

        prompt.push_str(
            "\nWrite one coherent insight of 50-80 words addressed to the reader in the \
             second person. Be warm, encouraging and concrete; weave the life areas \
             together naturally. No generic filler, no lists, no headings.",
        );

        prompt
    }

    /// The deterministic text used when generation is unavailable
    fn fallback(user_name: &str, sign: ZodiacSign) -> String {
        format!(
            "Dear {}, the stars shine steadily for {} today. Trust your instincts, \
             give your attention to the people and work that matter most, and take \
             one small, deliberate step toward something you have been putting off. \
             Quiet confidence will carry you further than haste.",
            user_name,
            sign.display_name()
        )
    }

    /// Produces the insight text for this user, sign and evidence
    pub async fn compose_and_generate(
        &self,
        user_name: &str,
        sign: ZodiacSign,
        items: &[RetrievedItem],
        context: Option<&DailyContext>,
    ) -> String {
        let prompt = Self::build_prompt(user_name, sign, items, context);

        let generated =
            tokio::time::timeout(self.generation_timeout, self.generator.complete(&prompt)).await;

        match generated {
            Ok(Ok(text)) if !text.trim().is_empty() => text.trim().to_string(),
            Ok(Ok(_)) => {
                warn!(
                    provider = self.generator.provider_name(),
                    "Generator returned empty text, using fallback"
                );
                Self::fallback(user_name, sign)
            }
            Ok(Err(e)) => {
                warn!(
                    provider = self.generator.provider_name(),
                    error = %e,
                    "Generation failed, using fallback"
                );
                Self::fallback(user_name, sign)
            }
            Err(_) => {
                warn!(
                    provider = self.generator.provider_name(),
                    "Generation timed out, using fallback"
                );
                Self::fallback(user_name, sign)
            }
        }
    }
}
