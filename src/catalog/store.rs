use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use serde::{de::DeserializeOwned, Deserialize};
use url::Url;

use super::episode::{default_instructions, Episode, GameContent};
use crate::{error::ContentError, panel::PanelContent, quiz::QuizDefinition, theme::Accent};

/// A quiz file from `quizzes/`, with the extra fields the site displayed.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuizFile {
    #[serde(flatten)]
    quiz: QuizDefinition,
    #[serde(default)]
    difficulty: Option<String>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    instructions: Vec<String>,
    #[serde(default)]
    color_theme: Option<String>,
}

/// An entry of `embeds.json`.
#[derive(Debug, Deserialize)]
struct EmbedGame {
    title: String,
    #[serde(default)]
    description: Option<String>,
    url: Url,
    #[serde(default)]
    difficulty: Option<String>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    instructions: Vec<String>,
}

/// Something a user can pick and play.
#[derive(Debug, Clone)]
pub struct CatalogEntry {
    name: String,
    description: String,
    instructions: Vec<String>,
    difficulty: Option<String>,
    category: Option<String>,
    accent: Accent,
    content: PanelContent,
}

#[derive(Debug, Clone)]
pub struct EpisodeEntry {
    episode: Episode,
    game: Option<CatalogEntry>,
}

pub trait RetrieveQuiz {
    fn retrieve_quiz(&self, name: &str) -> Option<CatalogEntry>;

    fn retrieve_all_quiz_names(&self) -> Vec<String>;
}

pub trait RetrieveEpisode {
    fn retrieve_episode(&self, label: &str) -> Option<EpisodeEntry>;

    fn retrieve_all_episode_labels(&self) -> Vec<String>;
}

/// Static content loaded once at startup.
#[derive(Debug, Default)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
    episodes: Vec<EpisodeEntry>,
}

impl CatalogEntry {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn instructions(&self) -> &[String] {
        &self.instructions
    }

    pub fn difficulty(&self) -> Option<&str> {
        self.difficulty.as_deref()
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn accent(&self) -> Accent {
        self.accent
    }

    pub fn content(&self) -> &PanelContent {
        &self.content
    }
}

impl EpisodeEntry {
    pub fn episode(&self) -> &Episode {
        &self.episode
    }

    pub fn game(&self) -> Option<&CatalogEntry> {
        self.game.as_ref()
    }

    /// Button label, e.g. `Episode 2: Code & Conscience`.
    pub fn label(&self) -> String {
        format!("Episode {}: {}", self.episode.id(), self.episode.title())
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ContentError> {
    let raw = fs::read_to_string(path).map_err(|source| ContentError::Io {
        path: path.to_owned(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| ContentError::Json {
        path: path.to_owned(),
        source,
    })
}

fn or_default_instructions(instructions: Vec<String>) -> Vec<String> {
    if instructions.is_empty() {
        default_instructions()
    } else {
        instructions
    }
}

impl Catalog {
    /// Reads `quizzes/*.json`, `episodes.json` and `embeds.json` from `dir`.
    /// Every piece is optional; a missing directory yields an empty catalog.
    pub fn load(dir: impl AsRef<Path>) -> Result<Self, ContentError> {
        let dir = dir.as_ref();
        let mut catalog = Catalog::default();
        let mut by_stem = QuizFiles::new();

        for path in quiz_files(&dir.join("quizzes"))? {
            let file: QuizFile = read_json(&path)?;
            file.quiz.validate()?;
            tracing::debug!("loaded quiz {} from {}", file.quiz, path.display());

            let quiz = Arc::new(file.quiz);
            let instructions = or_default_instructions(file.instructions);
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                by_stem.insert(stem.to_owned(), (Arc::clone(&quiz), instructions.clone()));
            }
            catalog.push_entry(CatalogEntry {
                name: quiz.title().to_owned(),
                description: quiz.description().to_owned(),
                instructions,
                difficulty: file.difficulty,
                category: file.category,
                accent: file
                    .color_theme
                    .as_deref()
                    .map(Accent::from_name)
                    .unwrap_or_default(),
                content: PanelContent::Quiz { quiz },
            })?;
        }

        let embeds_path = dir.join("embeds.json");
        if embeds_path.is_file() {
            let embeds: Vec<EmbedGame> = read_json(&embeds_path)?;
            for embed in embeds {
                catalog.push_entry(CatalogEntry {
                    name: embed.title.clone(),
                    description: embed
                        .description
                        .unwrap_or_else(|| "Enjoy this interactive game!".to_owned()),
                    instructions: embed.instructions,
                    difficulty: embed.difficulty,
                    category: embed.category,
                    accent: Accent::default(),
                    content: PanelContent::Embed {
                        url: embed.url,
                        title: embed.title,
                    },
                })?;
            }
        }

        let episodes_path = dir.join("episodes.json");
        if episodes_path.is_file() {
            let episodes: Vec<Episode> = read_json(&episodes_path)?;
            for episode in episodes {
                let game = episode_game(&episode, &by_stem)?;
                catalog.episodes.push(EpisodeEntry { episode, game });
            }
        }

        tracing::info!(
            "loaded {} games and {} episodes from {}",
            catalog.entries.len(),
            catalog.episodes.len(),
            dir.display()
        );
        Ok(catalog)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty() && self.episodes.is_empty()
    }

    fn push_entry(&mut self, entry: CatalogEntry) -> Result<(), ContentError> {
        if self.entries.iter().any(|e| e.name == entry.name) {
            return Err(ContentError::DuplicateEntry { name: entry.name });
        }
        self.entries.push(entry);
        Ok(())
    }
}

fn quiz_files(dir: &Path) -> Result<Vec<PathBuf>, ContentError> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let read = fs::read_dir(dir).map_err(|source| ContentError::Io {
        path: dir.to_owned(),
        source,
    })?;

    let mut paths = Vec::new();
    for item in read {
        let item = item.map_err(|source| ContentError::Io {
            path: dir.to_owned(),
            source,
        })?;
        let path = item.path();
        if path.extension().is_some_and(|ext| ext == "json") {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

/// Quiz files by stem, with their resolved instructions.
type QuizFiles = HashMap<String, (Arc<QuizDefinition>, Vec<String>)>;

fn episode_game(episode: &Episode, quizzes: &QuizFiles) -> Result<Option<CatalogEntry>, ContentError> {
    let Some(content) = episode.game_content() else {
        return Ok(None);
    };

    let (description, instructions, content) = match content {
        GameContent::EthicalDilemmas(set) => {
            let quiz = set.to_quiz(episode.title());
            quiz.validate()?;
            (
                set.about().to_owned(),
                set.instructions(),
                PanelContent::Quiz {
                    quiz: Arc::new(quiz),
                },
            )
        }
        GameContent::Quiz { file } => {
            let (quiz, instructions) = quizzes.get(file).ok_or_else(|| {
                ContentError::MissingQuizFile {
                    episode: episode.title().to_owned(),
                    file: file.clone(),
                }
            })?;
            (
                quiz.description().to_owned(),
                instructions.clone(),
                PanelContent::Quiz {
                    quiz: Arc::clone(quiz),
                },
            )
        }
        GameContent::Embed { url, title } => (
            episode.description().to_owned(),
            Vec::new(),
            PanelContent::Embed {
                url: url.clone(),
                title: title.clone().unwrap_or_else(|| episode.title().to_owned()),
            },
        ),
        GameContent::Custom { content } => (
            episode.description().to_owned(),
            Vec::new(),
            PanelContent::Custom {
                content: content.clone(),
            },
        ),
    };

    Ok(Some(CatalogEntry {
        name: episode.title().to_owned(),
        description,
        instructions,
        difficulty: None,
        category: None,
        accent: episode.accent(),
        content,
    }))
}

impl RetrieveQuiz for Catalog {
    fn retrieve_quiz(&self, name: &str) -> Option<CatalogEntry> {
        self.entries.iter().find(|e| e.name == name).cloned()
    }

    fn retrieve_all_quiz_names(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.name.clone()).collect()
    }
}

impl RetrieveEpisode for Catalog {
    fn retrieve_episode(&self, label: &str) -> Option<EpisodeEntry> {
        self.episodes.iter().find(|e| e.label() == label).cloned()
    }

    fn retrieve_all_episode_labels(&self) -> Vec<String> {
        self.episodes.iter().map(EpisodeEntry::label).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct ContentDir(PathBuf);

    impl ContentDir {
        fn new() -> Self {
            let path = std::env::temp_dir().join(format!("btcquizbot-{}", uuid::Uuid::new_v4()));
            fs::create_dir_all(path.join("quizzes")).unwrap();
            Self(path)
        }

        fn write(&self, name: &str, body: &str) {
            fs::write(self.0.join(name), body).unwrap();
        }
    }

    impl Drop for ContentDir {
        fn drop(&mut self) {
            let _ = fs::remove_dir_all(&self.0);
        }
    }

    const VARIABLES: &str = r#"{
        "title": "Episode 1: Variables",
        "description": "What do you remember about variables?",
        "difficulty": "Beginner",
        "category": "Programming",
        "questions": [
            { "id": "q1", "question": "A variable is...", "options": [
                { "text": "a named value", "correct": true },
                { "text": "a loop", "correct": false }
            ] }
        ]
    }"#;

    #[test]
    fn test_missing_directory_is_empty_catalog() {
        let catalog = Catalog::load("/definitely/not/here").unwrap();

        assert!(catalog.is_empty());
        assert!(catalog.retrieve_all_quiz_names().is_empty());
    }

    #[test]
    fn test_loads_quizzes_embeds_and_episodes() {
        let dir = ContentDir::new();
        dir.write("quizzes/episode1-variables.json", VARIABLES);
        dir.write(
            "embeds.json",
            r#"[{ "title": "ISE 222 Crossword Puzzle", "url": "https://crosswordlabs.com/embed/ise-222" }]"#,
        );
        dir.write(
            "episodes.json",
            r#"[
                { "id": 1, "title": "Variables", "colorTheme": "green",
                  "gameContent": { "type": "quiz", "file": "episode1-variables" } },
                { "id": 2, "title": "No game yet" }
            ]"#,
        );

        let catalog = Catalog::load(&dir.0).unwrap();

        assert_eq!(
            catalog.retrieve_all_quiz_names(),
            vec!["Episode 1: Variables", "ISE 222 Crossword Puzzle"]
        );
        let quiz = catalog.retrieve_quiz("Episode 1: Variables").unwrap();
        assert_eq!(quiz.difficulty(), Some("Beginner"));
        assert_eq!(quiz.instructions().len(), 5);
        assert!(matches!(quiz.content(), PanelContent::Quiz { .. }));

        let embed = catalog.retrieve_quiz("ISE 222 Crossword Puzzle").unwrap();
        assert!(matches!(embed.content(), PanelContent::Embed { .. }));

        assert_eq!(
            catalog.retrieve_all_episode_labels(),
            vec!["Episode 1: Variables", "Episode 2: No game yet"]
        );
        let episode = catalog.retrieve_episode("Episode 1: Variables").unwrap();
        let game = episode.game().unwrap();
        assert_eq!(game.accent(), Accent::Green);
        assert!(catalog
            .retrieve_episode("Episode 2: No game yet")
            .unwrap()
            .game()
            .is_none());
    }

    #[test]
    fn test_episode_quiz_keeps_file_instructions() {
        let dir = ContentDir::new();
        dir.write(
            "quizzes/loops.json",
            r#"{
                "title": "Loops",
                "instructions": ["Read the snippet", "Pick what it prints"],
                "questions": [
                    { "id": 1, "question": "Which one never ends?", "options": [
                        { "text": "loop {}", "correct": true },
                        { "text": "for _ in 0..3 {}" }
                    ] }
                ]
            }"#,
        );
        dir.write(
            "episodes.json",
            r#"[{ "id": 3, "title": "Loops", "gameContent": { "type": "quiz", "file": "loops" } }]"#,
        );

        let catalog = Catalog::load(&dir.0).unwrap();

        let episode = catalog.retrieve_episode("Episode 3: Loops").unwrap();
        assert_eq!(
            episode.game().unwrap().instructions(),
            ["Read the snippet", "Pick what it prints"]
        );
    }

    #[test]
    fn test_rejects_quiz_without_questions() {
        let dir = ContentDir::new();
        dir.write("quizzes/empty.json", r#"{ "title": "Empty", "questions": [] }"#);

        let result = Catalog::load(&dir.0);

        assert!(matches!(result, Err(ContentError::NoQuestions { .. })));
    }

    #[test]
    fn test_rejects_episode_pointing_at_missing_quiz() {
        let dir = ContentDir::new();
        dir.write(
            "episodes.json",
            r#"[{ "id": 1, "title": "Lost", "gameContent": { "type": "quiz", "file": "nope" } }]"#,
        );

        let result = Catalog::load(&dir.0);

        assert!(matches!(
            result,
            Err(ContentError::MissingQuizFile { file, .. }) if file == "nope"
        ));
    }

    #[test]
    fn test_reports_malformed_json_with_path() {
        let dir = ContentDir::new();
        dir.write("quizzes/broken.json", "{ not json");

        let err = Catalog::load(&dir.0).unwrap_err();

        assert!(matches!(err, ContentError::Json { ref path, .. } if path.ends_with("broken.json")));
    }
}
