use crate::error::GenerationError;
use crate::model::{GenerationParams, LlmBackend};
use rand::{seq::SliceRandom, Rng};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

pub const NO_JOKE: &str = "⚠️ No joke found.";
pub const ERROR_PREFIX: &str = "⚠️ Error generating joke: ";

/// Topics the prompt can be about. The repeats are intentional: a repeated
/// word is drawn proportionally more often.
pub const SUBJECTS: [&str; 59] = [
    "banana", "robot", "pirate", "spaceship", "wizard", "penguin",
    "vampire", "dinosaur", "detective", "ninja", "zombie", "alien",
    "astronaut", "time traveler", "cowboy", "unicorn", "octopus",
    "squirrel", "chicken", "ghost", "superhero", "scientist",
    "teacher", "doctor", "chef", "dog", "cat", "hamster", "elephant",
    "monkey", "koala", "turtle", "cactus", "caveman", "jellyfish",
    "kangaroo", "mermaid", "gnome", "fairy", "dragon", "owl",
    "skeleton", "t-rex", "werewolf", "bigfoot", "genie", "goldfish",
    "duck", "giraffe", "parrot", "sloth", "teddy bear", "panda",
    "penguin", "robot", "unicorn", "vampire", "zombie", "alien",
];

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Language {
    #[default]
    English,
    /// Hindi and English mixed.
    Hinglish,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::English, Language::Hinglish];

    pub fn as_str(self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Hinglish => "Hinglish",
        }
    }

    pub fn prompt(self, subject: &str) -> String {
        match self {
            Language::English => format!(
                "Tell me a funny, unique joke about {subject}. Keep it in simple, clear English."
            ),
            Language::Hinglish => format!(
                "Ek funny joke sunao {subject} ke baare mein, jo thoda Hindi aur thoda English mila ho. Thoda desi touch ho!"
            ),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("unsupported language {0:?}, expected English or Hinglish")]
pub struct UnknownLanguage(pub String);

impl FromStr for Language {
    type Err = UnknownLanguage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Language::ALL
            .into_iter()
            .find(|l| l.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownLanguage(s.to_string()))
    }
}

impl TryFrom<String> for Language {
    type Error = UnknownLanguage;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Language> for String {
    fn from(l: Language) -> Self {
        l.as_str().to_string()
    }
}

pub fn pick_subject<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    SUBJECTS.choose(rng).copied().unwrap_or(SUBJECTS[0])
}

/// What came back from one joke request, before it is turned into display text.
#[derive(Debug)]
pub enum JokeOutcome {
    Joke(String),
    NoJoke,
    Failed(GenerationError),
}

impl JokeOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            JokeOutcome::Joke(_) => "joke",
            JokeOutcome::NoJoke => "no_joke",
            JokeOutcome::Failed(_) => "failed",
        }
    }

    pub fn into_message(self) -> String {
        match self {
            JokeOutcome::Joke(text) => text,
            other => other.to_string(),
        }
    }
}

impl fmt::Display for JokeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JokeOutcome::Joke(text) => f.write_str(text),
            JokeOutcome::NoJoke => f.write_str(NO_JOKE),
            JokeOutcome::Failed(e) => write!(f, "{ERROR_PREFIX}{e}"),
        }
    }
}

pub struct JokeRequester<B> {
    backend: B,
    params: GenerationParams,
    timeout: Duration,
}

impl<B: LlmBackend> JokeRequester<B> {
    pub fn new(backend: B, params: GenerationParams, timeout: Duration) -> Self {
        Self { backend, params, timeout }
    }

    pub fn params(&self) -> &GenerationParams {
        &self.params
    }

    /// Always yields something displayable: the joke, the no-joke placeholder
    /// or a warning carrying the failure.
    pub async fn request_joke(&self, language: Language) -> String {
        self.generate(language).await.into_message()
    }

    pub async fn generate(&self, language: Language) -> JokeOutcome {
        let subject = pick_subject(&mut rand::thread_rng());
        self.generate_about(language, subject).await
    }

    pub async fn generate_about(&self, language: Language, subject: &str) -> JokeOutcome {
        let prompt = language.prompt(subject);
        debug!(%language, subject, "requesting joke");
        metrics::counter!("jokes_requested_total", "language" => language.as_str()).increment(1);

        let started = Instant::now();
        let result = tokio::time::timeout(self.timeout, self.backend.generate(&prompt, &self.params))
            .await
            .unwrap_or(Err(GenerationError::Timeout(self.timeout)));
        let elapsed = started.elapsed();
        metrics::histogram!("joke_generation_seconds").record(elapsed.as_secs_f64());

        let outcome = match result {
            Ok(Some(text)) if !text.trim().is_empty() => JokeOutcome::Joke(text),
            Ok(_) => JokeOutcome::NoJoke,
            Err(e) => JokeOutcome::Failed(e),
        };

        match &outcome {
            JokeOutcome::Failed(e) => {
                warn!(%language, kind = e.kind(), error = %e, ?elapsed, "joke generation failed")
            }
            other => info!(%language, outcome = other.label(), ?elapsed, "joke generated"),
        }
        metrics::counter!("joke_outcomes_total", "outcome" => outcome.label()).increment(1);

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};
    use std::collections::HashSet;
    use std::sync::Mutex;

    enum Reply {
        Text(&'static str),
        Empty,
        Fail,
        Hang,
    }

    struct ScriptedBackend {
        reply: Reply,
        prompts: Mutex<Vec<String>>,
    }

    impl ScriptedBackend {
        fn new(reply: Reply) -> Self {
            Self { reply, prompts: Mutex::new(Vec::new()) }
        }
    }

    #[async_trait::async_trait]
    impl LlmBackend for ScriptedBackend {
        async fn generate(
            &self,
            prompt: &str,
            _params: &GenerationParams,
        ) -> crate::error::Result<Option<String>> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            match self.reply {
                Reply::Text(t) => Ok(Some(t.to_string())),
                Reply::Empty => Ok(None),
                Reply::Fail => Err(GenerationError::Api {
                    status: reqwest::StatusCode::FORBIDDEN,
                    message: "API key not valid.".into(),
                }),
                Reply::Hang => {
                    tokio::time::sleep(Duration::from_secs(30)).await;
                    Ok(Some("too late".into()))
                }
            }
        }
    }

    fn requester(reply: Reply) -> JokeRequester<ScriptedBackend> {
        JokeRequester::new(
            ScriptedBackend::new(reply),
            GenerationParams::default(),
            Duration::from_millis(200),
        )
    }

    #[test]
    fn language_parsing_is_explicit() {
        assert_eq!("English".parse::<Language>(), Ok(Language::English));
        assert_eq!(" hinglish ".parse::<Language>(), Ok(Language::Hinglish));
        assert_eq!(
            "Klingon".parse::<Language>(),
            Err(UnknownLanguage("Klingon".to_string()))
        );
        assert_eq!(Language::default(), Language::English);
    }

    #[test]
    fn language_serde_uses_display_names() {
        let l: Language = serde_json::from_str("\"HINGLISH\"").unwrap();
        assert_eq!(l, Language::Hinglish);
        assert_eq!(serde_json::to_string(&Language::English).unwrap(), "\"English\"");
        assert!(serde_json::from_str::<Language>("\"French\"").is_err());
    }

    #[test]
    fn prompts_embed_subject() {
        assert_eq!(
            Language::English.prompt("owl"),
            "Tell me a funny, unique joke about owl. Keep it in simple, clear English."
        );
        assert_eq!(
            Language::Hinglish.prompt("owl"),
            "Ek funny joke sunao owl ke baare mein, jo thoda Hindi aur thoda English mila ho. Thoda desi touch ho!"
        );
    }

    #[test]
    fn vocabulary_shape() {
        assert_eq!(SUBJECTS.len(), 59);
        let distinct: HashSet<_> = SUBJECTS.iter().collect();
        assert_eq!(distinct.len(), 53);
        for doubled in ["penguin", "robot", "unicorn", "vampire", "zombie", "alien"] {
            assert_eq!(SUBJECTS.iter().filter(|s| **s == doubled).count(), 2, "{doubled}");
        }
        assert_eq!(SUBJECTS.iter().filter(|s| **s == "banana").count(), 1);
    }

    #[test]
    fn subjects_come_from_vocabulary_with_replacement() {
        let mut rng = StdRng::seed_from_u64(7);
        let draws: Vec<_> = (0..500).map(|_| pick_subject(&mut rng)).collect();
        assert!(draws.iter().all(|s| SUBJECTS.contains(s)));
        let distinct: HashSet<_> = draws.iter().collect();
        assert!(distinct.len() < draws.len());
    }

    #[test]
    fn repeated_subjects_are_weighted() {
        let mut rng = StdRng::seed_from_u64(42);
        let (mut penguin, mut banana) = (0u32, 0u32);
        for _ in 0..60_000 {
            match pick_subject(&mut rng) {
                "penguin" => penguin += 1,
                "banana" => banana += 1,
                _ => {}
            }
        }
        assert!(penguin * 2 > banana * 3, "penguin={penguin} banana={banana}");
    }

    #[tokio::test]
    async fn returns_provider_text_verbatim() {
        let r = requester(Reply::Text("Why did the robot cross the road?"));
        assert_eq!(
            r.request_joke(Language::English).await,
            "Why did the robot cross the road?"
        );
        let prompts = r.backend.prompts.lock().unwrap();
        assert!(prompts[0].starts_with("Tell me a funny, unique joke about "));
        assert!(SUBJECTS.iter().any(|s| prompts[0].contains(&format!("about {s}."))));
    }

    #[tokio::test]
    async fn hinglish_uses_mixed_template() {
        let r = requester(Reply::Text("haha"));
        r.request_joke(Language::Hinglish).await;
        let prompts = r.backend.prompts.lock().unwrap();
        assert!(prompts[0].starts_with("Ek funny joke sunao "));
    }

    #[tokio::test]
    async fn missing_text_gives_placeholder() {
        assert_eq!(requester(Reply::Empty).request_joke(Language::English).await, NO_JOKE);
        assert_eq!(
            requester(Reply::Text("   ")).request_joke(Language::Hinglish).await,
            NO_JOKE
        );
    }

    #[tokio::test]
    async fn provider_failure_becomes_warning() {
        let msg = requester(Reply::Fail).request_joke(Language::English).await;
        assert!(msg.starts_with(ERROR_PREFIX), "{msg}");
        assert!(msg.contains("API key not valid."), "{msg}");
    }

    #[tokio::test]
    async fn slow_provider_times_out() {
        let outcome = requester(Reply::Hang).generate(Language::English).await;
        assert!(matches!(outcome, JokeOutcome::Failed(GenerationError::Timeout(_))));
        assert!(outcome.to_string().starts_with("⚠️"));
    }

    #[tokio::test]
    async fn every_language_yields_non_empty_text() {
        for reply in [Reply::Text("ok"), Reply::Empty, Reply::Fail] {
            let r = requester(reply);
            for language in Language::ALL {
                assert!(!r.request_joke(language).await.is_empty());
            }
        }
    }
}
