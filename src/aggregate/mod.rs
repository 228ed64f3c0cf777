mod cell;
mod membership;
mod series;

pub use membership::{sum_within_country, CountryBoundaries, CountryMembership};
pub use series::{CountryRecord, CountrySeries};
