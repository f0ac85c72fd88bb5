//! Built-in location and AI name catalogs.
//!
//! Both lists can be overridden through configuration; these are the
//! defaults shipped with the game.

/// Locations every player except the outsider is told at round start.
pub const DEFAULT_LOCATIONS: [&str; 30] = [
    "Airport",
    "Bank",
    "Beach",
    "Casino",
    "Cathedral",
    "Circus Tent",
    "Corporate Party",
    "Crusader Army",
    "Day Spa",
    "Embassy",
    "Hospital",
    "Hotel",
    "Military Base",
    "Movie Studio",
    "Museum",
    "Ocean Liner",
    "Passenger Train",
    "Pirate Ship",
    "Polar Station",
    "Police Station",
    "Restaurant",
    "School",
    "Service Station",
    "Space Station",
    "Submarine",
    "Supermarket",
    "Theater",
    "University",
    "World War II Squad",
    "Zoo",
];

/// Gender-neutral display names handed out to AI players.
pub const AI_NAMES: [&str; 24] = [
    "Alex", "Blake", "Casey", "Drew", "Ellis", "Finley", "Gray", "Harper", "Indigo", "Jules",
    "Kai", "Lane", "Morgan", "Nova", "Ocean", "Parker", "Quinn", "River", "Sage", "Taylor",
    "Avery", "Cameron", "Dakota", "Emery",
];

/// Owned copy of the default location list.
pub fn default_locations() -> Vec<String> {
    DEFAULT_LOCATIONS.iter().map(|s| s.to_string()).collect()
}
