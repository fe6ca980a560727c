//! Candidate query strings for free-text addresses.
//!
//! Street intersections ("Mass Ave and Comm Ave") geocode poorly unless the
//! provider is offered several phrasings, so an address expands into an
//! ordered list of queries, richest first.

/// Separators that mark an address as a street intersection.
const INTERSECTION_SEPARATORS: [&str; 4] = [" and ", " & ", " @ ", " at "];

/// Canonical separator after normalization.
const CANONICAL_SEPARATOR: &str = " and ";

/// The city and state appended to queries that don't name a locality.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locality {
    pub city: String,
    pub state: String,
}

impl Locality {
    pub fn new(city: impl Into<String>, state: impl Into<String>) -> Self {
        Self {
            city: city.into(),
            state: state.into(),
        }
    }

    /// Suffix appended to a query, e.g. `", Boston, MA"`.
    pub fn suffix(&self) -> String {
        format!(", {}, {}", self.city, self.state)
    }

    /// Whether the address already names the city or state as a whole word.
    pub fn is_named_in(&self, address: &str) -> bool {
        let city = self.city.to_lowercase();
        let state = self.state.to_lowercase();
        address
            .to_lowercase()
            .split(|c: char| !c.is_alphanumeric())
            .any(|word| word == city || word == state)
    }

    /// Whether the address names the city as a whole word.
    pub fn names_city(&self, address: &str) -> bool {
        let city = self.city.to_lowercase();
        address
            .to_lowercase()
            .split(|c: char| !c.is_alphanumeric())
            .any(|word| word == city)
    }

    fn qualify(&self, query: &str) -> String {
        if self.is_named_in(query) {
            query.to_string()
        } else {
            format!("{query}{}", self.suffix())
        }
    }
}

impl Default for Locality {
    fn default() -> Self {
        Self::new("Boston", "MA")
    }
}

/// Whether an address looks like a street intersection.
pub fn is_intersection(address: &str) -> bool {
    let lower = address.to_lowercase();
    INTERSECTION_SEPARATORS.iter().any(|sep| lower.contains(sep))
}

/// Lowercase the address and rewrite every separator as `" and "`.
///
/// ```
/// use bike_finder::geocode::normalize_intersection;
///
/// assert_eq!(normalize_intersection("Main St @ Elm St"), "main st and elm st");
/// ```
pub fn normalize_intersection(address: &str) -> String {
    INTERSECTION_SEPARATORS
        .iter()
        .fold(address.to_lowercase(), |acc, sep| {
            acc.replace(sep, CANONICAL_SEPARATOR)
        })
}

/// Build the ordered list of queries to try for an address.
pub fn candidate_queries(address: &str, locality: &Locality) -> Vec<String> {
    let address = address.trim();
    let mut queries = Vec::new();

    if !is_intersection(address) {
        queries.push(locality.qualify(address));
        return queries;
    }

    let normalized = normalize_intersection(address);
    queries.push(locality.qualify(&normalized));
    queries.push(locality.qualify(address));

    let streets: Vec<&str> = normalized.split(CANONICAL_SEPARATOR).collect();
    if let [first, second] = streets.as_slice() {
        let (a, b) = (first.trim(), second.trim());
        // Only the city suppresses the suffix here; a bare state is too vague
        let suffix = if locality.names_city(&normalized) {
            String::new()
        } else {
            locality.suffix()
        };
        queries.extend([
            format!("{a} & {b}{suffix}"),
            format!("{a} at {b}{suffix}"),
            format!("intersection of {a} and {b}{suffix}"),
            format!("{a}/{b}{suffix}"),
        ]);
    }

    let mut seen = std::collections::HashSet::new();
    queries.retain(|q| seen.insert(q.clone()));
    queries
}
