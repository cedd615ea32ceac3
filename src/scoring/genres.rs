use std::collections::HashSet;

/// Genre labels that earn the genre bonus. Matching is exact and case-sensitive.
pub const CANONICAL_COOL_GENRES: &[&str] = &[
    "deathcore",
    "grindcore",
    "post-hardcore",
    "art pop",
    "experimental",
    "metal",
    "death metal",
    "metalcore",
    "black metal",
    "emo",
    "midwest emo",
    "djent",
    "math rock",
    "experimental hip hop",
    "hardcore",
    "hardcore punk",
    "powerviolence",
    "shoegaze",
    "rnb",
    "r&b",
    "soul",
    "synthpop",
    "new wave",
    "alternative rnb",
    "deathgrind",
    "brutal death metal",
    "speed metal",
    "electronic",
    "trip hop",
    "indie rock",
    "melodic hardcore",
    "noise",
    "noisecore",
    "noise rock",
    "noisegrind",
    "gorenoise",
    "slowcore",
    "thrash metal",
    "crust punk",
    "technical death metal",
    "chamber pop",
    "screamo",
    "post-rock",
    "folk metal",
    "dream pop",
    "post-punk",
    "industrial rock",
    "deathrash",
    "death metal/black metal",
    "crossover thrash",
    "avant-garde",
    "drone",
    "emoviolence",
    "emocore",
    "j-rock",
    "alternative hip-hop",
    "doom metal",
    "post-metal",
    "idm",
    "mathcore",
    "horrorcore",
    "hyperpop",
    "dark ambient",
    "ambient",
    "proto-punk",
    "house",
    "downtempo",
    "atmospheric black metal",
    "goregrind",
    "pornogrind",
    "trance",
    "breakcore",
    "jazz",
    "sludge metal",
    "emo pop",
    "rage rap",
    "rage",
    "folk punk",
    "industrial",
    "art rock",
    "neofolk",
    "skate punk",
    "jazz fusion",
    "jazz funk",
    "space rock",
    "big beat",
    "breakbeat",
    "hardcore techno",
    "disco",
    "hi-nrg",
    "french house",
    "electronica",
    "electro",
    "ebm",
    "alternative rock",
    "progressive rock",
    "progressive metal",
    "punk",
    "groove metal",
    "heavy metal",
    "grunge",
    "hip hop",
    "east coast hip hop",
    "southern hip hop",
    "rap",
    "jazz rap",
    "garage rock",
    "indie punk",
    "soundtrack",
    "ska punk",
    "cloud rap",
    "gangster rap",
    "memphis rap",
    "madchester",
    "dark trap",
    "crunk",
    "underground rap",
    "underground hip hop",
    "mincecore",
    "stoner metal",
    "stoner rock",
    "drone metal",
    "slam death metal",
    "slamming brutal death metal",
];

/// Immutable set of "cool" genre labels handed to the scorer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoolGenres {
    labels: HashSet<String>,
}

impl CoolGenres {
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            labels: labels.into_iter().map(Into::into).collect(),
        }
    }

    pub fn canonical() -> Self {
        Self::new(CANONICAL_COOL_GENRES.iter().copied())
    }

    /// Load an alternate genre set from a JSON array of strings
    pub fn load_from_file(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let labels: Vec<String> = serde_json::from_str(&content)?;
        Ok(Self::new(labels))
    }

    pub fn contains(&self, genre: &str) -> bool {
        self.labels.contains(genre)
    }

    /// True if any of the given genres is in the set
    pub fn matches_any(&self, genres: &[String]) -> bool {
        genres.iter().any(|genre| self.contains(genre))
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

impl Default for CoolGenres {
    fn default() -> Self {
        Self::canonical()
    }
}
