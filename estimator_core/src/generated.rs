//! Data tables compiled from `data/*.toml` by `build.rs`.

pub mod rate_data {
    use crate::rates::RateCategory;

    /// One row of the default rate table.
    #[derive(Debug, Clone, Copy)]
    pub struct RateSeed {
        pub id: &'static str,
        pub label: &'static str,
        pub unit: &'static str,
        pub category: RateCategory,
        pub price: f64,
    }

    include!(concat!(env!("OUT_DIR"), "/rate_data.rs"));
}
