//! Curated genre and title lists used whenever live scraping fails or under-delivers

/// Genre whose titles stand in for genres without a curated list
pub const DEFAULT_TITLE_GENRE: &str = "Hip-Hop";

const GENRES: &[&str] = &[
    "Hip-Hop", "Trap", "R&B", "Drill", "Boom Bap",
    "Lo-Fi", "Jersey Club", "Afrobeats", "Reggaeton",
    "Pop", "EDM", "Soul", "Dancehall", "House",
];

const TITLES: &[(&str, &[&str])] = &[
    ("Hip-Hop", &[
        "Midnight Thunder", "Urban Echoes", "City Lights", "Soul Progression",
        "Breakbeat Journey", "Concrete Jungle", "Subway Cypher", "Block Party",
        "Classic Vibes", "Boom Bap Boulevard", "Street Corner", "Vinyl Days",
        "Flow State", "Word Play", "Rhythm Section",
    ]),
    ("Trap", &[
        "Neon Dreams", "Dark Ambition", "808 Waves", "Purple Haze",
        "Future Vision", "Drip Season", "Flexin'", "Money Talk",
        "Trap House", "Late Night", "On Sight", "Bass Cannon",
        "High Life", "Atlanta Nights", "Codeine Sunset",
    ]),
    ("R&B", &[
        "Velvet Mood", "Smooth Sensation", "Slow Burn", "Passion Flow",
        "Summer Nights", "Midnight Confessions", "Pillow Talk", "Love Letters",
        "Silky Smooth", "Afterhours", "Tender Touch", "Ocean Waves",
        "Bedroom Eyes", "Candlelight", "Soul Therapy",
    ]),
    ("Drill", &[
        "Street Stories", "Dark Corner", "Night Shift", "Concrete Jungle",
        "Urban Warfare", "Cold Winter", "City Nights", "Block Heat",
        "Gang Activity", "Gritty City", "Street Life", "Hood Dreams",
        "Violent Thoughts", "Dark Alley", "Midnight Hustle",
    ]),
    ("Boom Bap", &[
        "Golden Era", "Vinyl Days", "Turntable Dreams", "Break Beats",
        "Classic Samples", "90s Flavor", "DJ Premier", "Scratched Chorus",
        "Brooklyn Beats", "Jazzy Loops", "Dusty Fingers", "Sample Masters",
        "Hip-Hop Classics", "Turntable Legends", "Lyrical Playground",
    ]),
    ("Lo-Fi", &[
        "Chill Study", "Coffee House", "Rainy Day", "Vinyl Crackle",
        "Late Night Session", "Bedroom Beats", "Sleepy Sunday", "Gentle Waves",
        "Urban Calm", "Soulful Memory", "Dusty Rhodes", "Cloudy Mind",
        "Lazy Afternoon", "Tape Cassette", "Old School Vibe",
    ]),
    ("Jersey Club", &[
        "Dance Floor", "Club Heat", "Party Starter", "Night Vibes",
        "Bounce Back", "Club Energy", "Weekend Fun", "Dance Battle",
        "City Club", "Night Moves", "Beat Drop", "Urban Dance",
        "Rhythm Nation", "Club Anthem", "Dance Fever",
    ]),
    ("Afrobeats", &[
        "Lagos Nights", "African Rhythm", "Tribal Fusion", "Sunset Dance",
        "Tropical Vibes", "Afro Wave", "Island Dreams", "Summer Heat",
        "Beach Party", "African Spirit", "Desert Gold", "Drum Circle",
        "Motherland", "Ancestral Beats", "Sunshine Rhythm",
    ]),
    ("Reggaeton", &[
        "Latino Heat", "Club Caliente", "Playa Vida", "Island Dreams",
        "Tropical Nights", "Summer Vibes", "Latin Rhythm", "Beach Party",
        "Bailando", "Fiesta Nights", "Hot Summer", "Sunset Beach",
        "Caribbean Flow", "Ritmo Latino", "Dance Floor",
    ]),
    ("Pop", &[
        "Radio Hit", "Summer Anthem", "Chart Topper", "Melody Maker",
        "Catchy Chorus", "Mainstream Magic", "Studio Sessions", "Pop Princess",
        "Viral Moment", "Hit Factory", "Earworm", "Dance Pop",
        "Pop Perfection", "Billboard Dreams", "Top 40",
    ]),
    ("EDM", &[
        "Festival Nights", "Drop Zone", "Electric Sky", "Bass Nation",
        "Neon Lights", "Club Remix", "Rave Culture", "Synth Wave",
        "Digital Dreams", "Future Bass", "Laser Show", "Electronic Pulse",
        "Dance Floor", "Beat Drop", "Energy Surge",
    ]),
];

/// Read-only genre -> titles mapping with a fixed genre ordering
#[derive(Debug, Clone, Copy)]
pub struct FallbackCatalog {
    genres: &'static [&'static str],
    titles: &'static [(&'static str, &'static [&'static str])],
}

impl FallbackCatalog {
    /// Catalog backed by caller-supplied static data
    pub const fn new(
        genres: &'static [&'static str],
        titles: &'static [(&'static str, &'static [&'static str])],
    ) -> Self {
        Self { genres, titles }
    }

    /// The curated catalog shipped with the service
    pub const fn builtin() -> Self {
        Self::new(GENRES, TITLES)
    }

    /// Default genre ordering
    pub fn genres(&self) -> Vec<String> {
        self.genres.iter().map(|g| g.to_string()).collect()
    }

    /// Curated titles for `genre`; empty when the genre is unknown
    pub fn titles(&self, genre: &str) -> Vec<String> {
        self.lookup(genre)
            .map(|titles| titles.iter().map(|t| t.to_string()).collect())
            .unwrap_or_default()
    }

    /// Curated titles for `genre`, or the Hip-Hop list when the genre has none
    pub fn titles_or_default(&self, genre: &str) -> Vec<String> {
        let titles = self.titles(genre);
        if titles.is_empty() {
            self.titles(DEFAULT_TITLE_GENRE)
        } else {
            titles
        }
    }

    /// Whether `genre` has a non-empty curated list
    pub fn has_titles(&self, genre: &str) -> bool {
        self.lookup(genre).map_or(false, |titles| !titles.is_empty())
    }

    /// Whether `text` mentions one of the default genre names
    pub fn mentions_genre(&self, text: &str) -> bool {
        self.genres.iter().any(|genre| text.contains(genre))
    }

    fn lookup(&self, genre: &str) -> Option<&'static [&'static str]> {
        self.titles
            .iter()
            .find(|(name, _)| *name == genre)
            .map(|(_, titles)| *titles)
    }
}

impl Default for FallbackCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}
