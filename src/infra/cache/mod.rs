pub mod moka_occurrence_cache;
