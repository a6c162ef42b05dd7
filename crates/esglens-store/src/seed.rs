//! Starter-catalog seeding.

use std::sync::Arc;

use esglens_core::{Company, CompanyDraft, UtcDateTime};

use crate::companies::CompanyRepository;
use crate::repository::EntityStore;
use crate::StoreError;

/// Outcome of a seeding run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedReport {
    /// Companies written by this run.
    pub companies_seeded: u64,
    /// True when the dataset was already populated and seeding was skipped.
    pub skipped: bool,
}

/// Seeds the starter catalog into an empty store.
pub struct Seeder;

impl Seeder {
    /// Seed the catalog unless the dataset already holds companies.
    pub fn run(store: Arc<dyn EntityStore<Company>>) -> Result<SeedReport, StoreError> {
        let mut repository = CompanyRepository::new(store);

        if repository.total_count()? > 0 {
            tracing::info!("dataset already populated, skipping seed");
            return Ok(SeedReport {
                companies_seeded: 0,
                skipped: true,
            });
        }

        let catalog = seed_catalog();
        tracing::info!(companies = catalog.len(), "seeding starter catalog");

        repository.add_range(catalog);
        let affected = repository.save_changes()?;

        tracing::info!(companies = affected, "seeding completed");
        Ok(SeedReport {
            companies_seeded: affected,
            skipped: false,
        })
    }
}

/// The six-company starter catalog.
pub fn seed_catalog() -> Vec<Company> {
    let created_at = UtcDateTime::now();

    seed_entries()
        .into_iter()
        .map(|entry| {
            let mut company = entry
                .draft
                .into_company(created_at)
                .expect("seed catalog entries are valid");
            company.ai_analysis = Some(entry.analysis.to_owned());
            company.investment_recommendation = Some(entry.recommendation.to_owned());
            company
        })
        .collect()
}

struct SeedEntry {
    draft: CompanyDraft,
    analysis: &'static str,
    recommendation: &'static str,
}

fn seed_entries() -> Vec<SeedEntry> {
    vec![
        SeedEntry {
            draft: CompanyDraft {
                name: "Apple Inc.".into(),
                symbol: "AAPL".into(),
                industry: "Technology".into(),
                sector: "Consumer Electronics".into(),
                market_cap: 3_000_000_000_000.0,
                country: "United States".into(),
                revenue: 394_328_000_000.0,
                esg_score: 82.5,
                risk_level: "Low".into(),
            },
            analysis: "Strong technological leadership with excellent ESG practices",
            recommendation: "STRONG BUY - Consistent growth and innovation",
        },
        SeedEntry {
            draft: CompanyDraft {
                name: "Tesla Inc.".into(),
                symbol: "TSLA".into(),
                industry: "Automotive".into(),
                sector: "Electric Vehicles".into(),
                market_cap: 800_000_000_000.0,
                country: "United States".into(),
                revenue: 96_773_000_000.0,
                esg_score: 78.2,
                risk_level: "Medium".into(),
            },
            analysis: "Leading EV manufacturer with strong environmental impact",
            recommendation: "BUY - High growth potential in sustainable transport",
        },
        SeedEntry {
            draft: CompanyDraft {
                name: "Microsoft Corporation".into(),
                symbol: "MSFT".into(),
                industry: "Technology".into(),
                sector: "Software".into(),
                market_cap: 2_500_000_000_000.0,
                country: "United States".into(),
                revenue: 211_915_000_000.0,
                esg_score: 85.0,
                risk_level: "Low".into(),
            },
            analysis: "Dominant cloud computing position with excellent ESG credentials",
            recommendation: "STRONG BUY - Reliable growth and strong fundamentals",
        },
        SeedEntry {
            draft: CompanyDraft {
                name: "Unilever PLC".into(),
                symbol: "UL".into(),
                industry: "Consumer Goods".into(),
                sector: "Personal Care".into(),
                market_cap: 150_000_000_000.0,
                country: "United Kingdom".into(),
                revenue: 60_069_000_000.0,
                esg_score: 88.5,
                risk_level: "Low".into(),
            },
            analysis: "ESG leader with strong sustainable business practices",
            recommendation: "BUY - Excellent ESG profile with stable returns",
        },
        SeedEntry {
            draft: CompanyDraft {
                name: "NextEra Energy Inc.".into(),
                symbol: "NEE".into(),
                industry: "Utilities".into(),
                sector: "Renewable Energy".into(),
                market_cap: 160_000_000_000.0,
                country: "United States".into(),
                revenue: 20_956_000_000.0,
                esg_score: 92.0,
                risk_level: "Low".into(),
            },
            analysis: "Leading renewable energy company with top ESG score",
            recommendation: "STRONG BUY - Perfect ESG investment with growth potential",
        },
        SeedEntry {
            draft: CompanyDraft {
                name: "Saudi Aramco".into(),
                symbol: "2222.SR".into(),
                industry: "Energy".into(),
                sector: "Oil & Gas".into(),
                market_cap: 2_100_000_000_000.0,
                country: "Saudi Arabia".into(),
                revenue: 535_000_000_000.0,
                esg_score: 45.0,
                risk_level: "High".into(),
            },
            analysis: "High revenue but significant ESG concerns in fossil fuel sector",
            recommendation: "HOLD - Monitor ESG improvements and energy transition",
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;

    #[test]
    fn seeds_six_companies_into_empty_store() {
        let store = Arc::new(MemoryStore::new());

        let report = Seeder::run(store.clone()).unwrap();

        assert_eq!(report.companies_seeded, 6);
        assert!(!report.skipped);
        assert_eq!(store.count_where(None).unwrap(), 6);
    }

    #[test]
    fn seeding_is_idempotent() {
        let store = Arc::new(MemoryStore::new());

        Seeder::run(store.clone()).unwrap();
        let second = Seeder::run(store.clone()).unwrap();

        assert!(second.skipped);
        assert_eq!(second.companies_seeded, 0);
        assert_eq!(store.count_where(None).unwrap(), 6);
    }

    #[test]
    fn catalog_symbols_are_normalized_and_distinct() {
        let catalog = seed_catalog();
        let symbols: Vec<_> = catalog
            .iter()
            .map(|company| company.symbol.as_str().to_owned())
            .collect();

        assert_eq!(symbols, ["AAPL", "TSLA", "MSFT", "UL", "NEE", "2222.SR"]);
    }
}
