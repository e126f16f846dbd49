use include_dir::{include_dir, Dir};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::difficulty::Difficulty;
use crate::error::CorpusError;

static CORPUS_DIR: Dir = include_dir!("src/corpus");

/// Supplies target sentences for a difficulty tier
pub trait SentenceSource {
    fn next_sentence(&mut self, difficulty: Difficulty) -> String;
}

impl<T: SentenceSource + ?Sized> SentenceSource for Box<T> {
    fn next_sentence(&mut self, difficulty: Difficulty) -> String {
        (**self).next_sentence(difficulty)
    }
}

/// On-disk shape of one corpus file
#[derive(Deserialize, Clone, Debug)]
struct CorpusFile {
    difficulty: Difficulty,
    sentences: Vec<String>,
}

/// Fixed sentence pools per tier, picked from uniformly at random.
/// Repeats are allowed; nothing is remembered between picks.
#[derive(Debug, Clone)]
pub struct SentencePool {
    pools: HashMap<Difficulty, Vec<String>>,
    rng: StdRng,
}

impl SentencePool {
    /// Pools embedded in the binary
    pub fn builtin() -> Self {
        let files = CORPUS_DIR
            .files()
            .filter_map(|file| file.contents_utf8())
            .map(|contents| serde_json::from_str::<CorpusFile>(contents))
            .collect::<Result<Vec<_>, _>>()
            .expect("Unable to deserialize embedded corpus");

        Self::from_corpus(files).expect("Embedded corpus covers every difficulty")
    }

    /// Load every `*.json` corpus file in `dir`
    pub fn from_dir<P: AsRef<Path>>(dir: P) -> Result<Self, CorpusError> {
        let mut files = Vec::new();
        for entry in fs::read_dir(dir.as_ref())? {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                let contents = fs::read_to_string(&path)?;
                files.push(serde_json::from_str::<CorpusFile>(&contents)?);
            }
        }

        if files.is_empty() {
            return Err(CorpusError::Missing(dir.as_ref().display().to_string()));
        }

        Self::from_corpus(files)
    }

    /// Build pools from explicit sentence lists
    pub fn from_pools(pools: HashMap<Difficulty, Vec<String>>) -> Result<Self, CorpusError> {
        let files = pools
            .into_iter()
            .map(|(difficulty, sentences)| CorpusFile {
                difficulty,
                sentences,
            })
            .collect();
        Self::from_corpus(files)
    }

    fn from_corpus(files: Vec<CorpusFile>) -> Result<Self, CorpusError> {
        let mut pools: HashMap<Difficulty, Vec<String>> = HashMap::new();
        for file in files {
            pools.entry(file.difficulty).or_default().extend(
                file.sentences
                    .iter()
                    .map(|s| s.trim())
                    .filter(|s| !s.is_empty())
                    .map(String::from),
            );
        }

        if let Some(empty) = Difficulty::ALL
            .into_iter()
            .find(|d| pools.get(d).map_or(true, |p| p.is_empty()))
        {
            return Err(CorpusError::EmptyPool(empty));
        }

        Ok(Self {
            pools,
            rng: StdRng::from_entropy(),
        })
    }

    /// Make selection reproducible
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn sentences(&self, difficulty: Difficulty) -> &[String] {
        self.pools
            .get(&difficulty)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

impl Default for SentencePool {
    fn default() -> Self {
        Self::builtin()
    }
}

impl SentenceSource for SentencePool {
    fn next_sentence(&mut self, difficulty: Difficulty) -> String {
        let pool = self
            .pools
            .get(&difficulty)
            .map(Vec::as_slice)
            .unwrap_or_default();

        // pools are checked non-empty on construction
        let sentence = pool.choose(&mut self.rng).cloned().unwrap_or_default();
        debug!(%difficulty, %sentence, "picked sentence");
        sentence
    }
}

/// Cycles through a fixed list regardless of tier
#[derive(Debug, Clone)]
pub struct FixedSentences {
    sentences: Vec<String>,
    next: usize,
}

impl FixedSentences {
    /// Sentences are trimmed and blank ones dropped. An empty sentence would
    /// complete on every keystroke, so at least one must remain.
    pub fn new<I, S>(sentences: I) -> Result<Self, CorpusError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let sentences: Vec<String> = sentences
            .into_iter()
            .map(Into::into)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        if sentences.is_empty() {
            return Err(CorpusError::NoSentences);
        }

        Ok(Self { sentences, next: 0 })
    }
}

impl SentenceSource for FixedSentences {
    fn next_sentence(&mut self, _difficulty: Difficulty) -> String {
        let sentence = self.sentences[self.next % self.sentences.len()].clone();
        self.next += 1;
        sentence
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_builtin_covers_every_tier() {
        let pool = SentencePool::builtin();
        for difficulty in Difficulty::ALL {
            assert_eq!(pool.sentences(difficulty).len(), 5);
        }
        assert!(pool
            .sentences(Difficulty::Easy)
            .contains(&"The cat sat on the mat.".to_string()));
    }

    #[test]
    fn test_next_sentence_comes_from_tier() {
        let mut pool = SentencePool::builtin().with_seed(7);
        for difficulty in Difficulty::ALL {
            for _ in 0..20 {
                let sentence = pool.next_sentence(difficulty);
                assert!(pool.sentences(difficulty).contains(&sentence));
            }
        }
    }

    #[test]
    fn test_selection_varies() {
        let mut pool = SentencePool::builtin().with_seed(42);
        let picked: HashSet<String> = (0..100)
            .map(|_| pool.next_sentence(Difficulty::Medium))
            .collect();
        assert!(picked.len() > 1);
    }

    #[test]
    fn test_seeded_pools_repeat() {
        let mut a = SentencePool::builtin().with_seed(3);
        let mut b = SentencePool::builtin().with_seed(3);
        for _ in 0..10 {
            assert_eq!(
                a.next_sentence(Difficulty::Hard),
                b.next_sentence(Difficulty::Hard)
            );
        }
    }

    #[test]
    fn test_from_pools_rejects_empty_tier() {
        let mut pools = HashMap::new();
        pools.insert(Difficulty::Easy, vec!["a b".to_string()]);
        pools.insert(Difficulty::Medium, vec!["   ".to_string()]);
        pools.insert(Difficulty::Hard, vec!["c d".to_string()]);

        match SentencePool::from_pools(pools) {
            Err(CorpusError::EmptyPool(Difficulty::Medium)) => {}
            other => panic!("expected empty medium pool, got {other:?}"),
        }
    }

    #[test]
    fn test_from_pools_trims_sentences() {
        let pools = Difficulty::ALL
            .into_iter()
            .map(|d| (d, vec![format!("  {d} sentence. ")]))
            .collect();
        let pool = SentencePool::from_pools(pools).unwrap();
        assert_eq!(pool.sentences(Difficulty::Hard), ["hard sentence."]);
    }

    #[test]
    fn test_from_dir() {
        let dir = tempfile::tempdir().unwrap();
        for d in Difficulty::ALL {
            fs::write(
                dir.path().join(format!("{d}.json")),
                format!(r#"{{"difficulty": "{d}", "sentences": ["custom {d}."]}}"#),
            )
            .unwrap();
        }
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let mut pool = SentencePool::from_dir(dir.path()).unwrap();
        assert_eq!(pool.next_sentence(Difficulty::Easy), "custom easy.");
    }

    #[test]
    fn test_from_dir_without_corpus() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            SentencePool::from_dir(dir.path()),
            Err(CorpusError::Missing(_))
        ));
    }

    #[test]
    fn test_fixed_sentences_cycle() {
        let mut source = FixedSentences::new(["one", "two"]).unwrap();
        assert_eq!(source.next_sentence(Difficulty::Easy), "one");
        assert_eq!(source.next_sentence(Difficulty::Hard), "two");
        assert_eq!(source.next_sentence(Difficulty::Medium), "one");
    }

    #[test]
    fn test_boxed_source() {
        let mut source: Box<dyn SentenceSource> = Box::new(FixedSentences::new(["only"]).unwrap());
        assert_eq!(source.next_sentence(Difficulty::Easy), "only");
    }

    #[test]
    fn test_fixed_sentences_need_text() {
        assert!(matches!(
            FixedSentences::new(Vec::<String>::new()),
            Err(CorpusError::NoSentences)
        ));
        assert!(matches!(
            FixedSentences::new(["", "   "]),
            Err(CorpusError::NoSentences)
        ));

        let mut source = FixedSentences::new(["  ", " padded "]).unwrap();
        assert_eq!(source.next_sentence(Difficulty::Easy), "padded");
        assert_eq!(source.next_sentence(Difficulty::Easy), "padded");
    }
}
