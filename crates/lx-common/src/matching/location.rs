use crate::CandidateProfile;

/// Client location split into its city and optional region ("Montréal, QC").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientLocation {
    pub city: String,
    pub region: Option<String>,
}

impl ClientLocation {
    /// Returns `None` for blank input.
    pub fn parse(raw: &str) -> Option<Self> {
        let mut parts = raw.splitn(2, ',');
        let city = parts.next().map(str::trim).unwrap_or_default();
        if city.is_empty() {
            return None;
        }

        let region = parts
            .next()
            .map(str::trim)
            .filter(|region| !region.is_empty())
            .map(str::to_string);

        Some(Self {
            city: city.to_string(),
            region,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Proximity {
    SameCity,
    SameRegion,
    Elsewhere,
    /// Client location or candidate city missing.
    Unknown,
}

fn same_place(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}

/// Compares the client's location with the candidate's city/province. When the
/// client gave no region, `home_region` stands in for it.
pub fn evaluate_proximity(
    client_location: Option<&str>,
    candidate: &CandidateProfile,
    home_region: &str,
) -> Proximity {
    let Some(client) = client_location.and_then(ClientLocation::parse) else {
        return Proximity::Unknown;
    };
    let Some(candidate_city) = candidate
        .city
        .as_deref()
        .filter(|city| !city.trim().is_empty())
    else {
        return Proximity::Unknown;
    };

    if same_place(&client.city, candidate_city) {
        return Proximity::SameCity;
    }

    let client_region = client.region.as_deref().unwrap_or(home_region);
    match candidate.province.as_deref() {
        Some(province) if same_place(province, client_region) => Proximity::SameRegion,
        _ => Proximity::Elsewhere,
    }
}
