use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::domain::measurement::MeasurementItem;
use crate::domain::spec::{InsulationSpec, SystemType};

/// Keyword lists defining what the business prices. These are configuration,
/// not code: a deployment can ship its own lists without touching the filter.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopeConfig {
    pub include_keywords: Vec<String>,
    pub exclude_keywords: Vec<String>,
    pub admitted_systems: BTreeSet<SystemType>,
}

impl Default for ScopeConfig {
    fn default() -> Self {
        let include = [
            "duct wrap",
            "ductwork",
            "supply duct",
            "return duct",
            "exhaust duct",
            "chilled water",
            "hot water",
            "condenser water",
            "steam",
            "condensate",
            "equipment insulation",
            "kitchen exhaust",
            "grease duct",
            "fireproofing",
            "weatherproof",
            "aluminum jacket",
            "pvc jacket",
            "exterior",
            "exposed",
            // admitted system types count as include keywords on their own
            "duct",
            "pipe",
            "equipment",
        ];
        let exclude = [
            "duct liner",
            "liner",
            "internal liner",
            "acoustic liner",
            "waste",
            "sanitary",
            "domestic water",
            "plumbing",
            "drain",
            "sewer",
            "fire sprinkler",
            "sprinkler pipe",
            "fire protection pipe",
            "underground",
            "buried",
            "below grade",
        ];

        Self {
            include_keywords: include.iter().map(|s| (*s).to_owned()).collect(),
            exclude_keywords: exclude.iter().map(|s| (*s).to_owned()).collect(),
            admitted_systems: BTreeSet::from([
                SystemType::Duct,
                SystemType::Pipe,
                SystemType::Equipment,
            ]),
        }
    }
}

impl ScopeConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.include_keywords.iter().chain(&self.exclude_keywords).any(|kw| kw.trim().is_empty())
        {
            return Err("scope keyword lists must not contain empty entries".to_owned());
        }
        Ok(())
    }
}

/// Anything the scope filter can classify. The searchable text is the
/// record's system type, size descriptor, and notes, lower-cased.
pub trait Scopeable {
    fn scope_text(&self) -> String;
    fn scope_system(&self) -> SystemType;
    fn label(&self) -> String;
}

impl Scopeable for InsulationSpec {
    fn scope_text(&self) -> String {
        format!("{} {} {}", self.system_type, self.size_range, self.notes).to_lowercase()
    }

    fn scope_system(&self) -> SystemType {
        self.system_type
    }

    fn label(&self) -> String {
        format!("{} spec ({})", self.system_type, self.size_range)
    }
}

impl Scopeable for MeasurementItem {
    fn scope_text(&self) -> String {
        format!("{} {} {}", self.system_type, self.size, self.notes).to_lowercase()
    }

    fn scope_system(&self) -> SystemType {
        self.system_type.into()
    }

    fn label(&self) -> String {
        self.item_id.clone()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExcludedRecord<T> {
    pub record: T,
    pub reason: String,
}

/// Advisory signal: a record matched both lists. Exclusion still wins; this
/// exists so the application layer can surface the collision for review.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopeWarning {
    pub label: String,
    pub include_hit: String,
    pub exclude_hit: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopeReport<T> {
    pub admitted: Vec<T>,
    pub excluded: Vec<ExcludedRecord<T>>,
    pub warnings: Vec<ScopeWarning>,
}

impl<T> ScopeReport<T> {
    /// One-line exclusion summary for the bid package.
    pub fn summary(&self, what: &str) -> String {
        if self.excluded.is_empty() {
            return format!("All {what} fall within scope (external HVAC/mechanical insulation only).");
        }
        let reasons: Vec<&str> =
            self.excluded.iter().map(|e| e.reason.as_str()).collect();
        format!(
            "Scope filter applied: {} of {} {what} excluded ({}).",
            self.excluded.len(),
            self.excluded.len() + self.admitted.len(),
            reasons.join("; ")
        )
    }
}

enum Decision {
    Admit,
    Exclude(String),
}

/// Classifies records as in-scope or excluded. Never fails: every record
/// lands in exactly one of the two output sequences, order preserved.
#[derive(Clone, Debug, Default)]
pub struct ScopeFilter {
    config: ScopeConfig,
}

impl ScopeFilter {
    pub fn new(config: ScopeConfig) -> Self {
        Self { config }
    }

    pub fn split<T: Scopeable>(&self, records: Vec<T>) -> ScopeReport<T> {
        let mut report =
            ScopeReport { admitted: Vec::new(), excluded: Vec::new(), warnings: Vec::new() };

        for record in records {
            let text = record.scope_text();
            let include_hit = self.first_hit(&self.config.include_keywords, &text);
            let decision = self.decide(&text, record.scope_system(), include_hit.is_some());

            match decision {
                Decision::Admit => report.admitted.push(record),
                Decision::Exclude(reason) => {
                    if let Some(include_hit) = include_hit {
                        if reason != "no matching in-scope keyword" {
                            report.warnings.push(ScopeWarning {
                                label: record.label(),
                                include_hit,
                                exclude_hit: reason.clone(),
                            });
                        }
                    }
                    report.excluded.push(ExcludedRecord { record, reason });
                }
            }
        }

        report
    }

    fn decide(&self, text: &str, system: SystemType, include_matched: bool) -> Decision {
        if let Some(keyword) = self.first_hit(&self.config.exclude_keywords, text) {
            return Decision::Exclude(keyword);
        }
        // Duct liner work is internal and never priced, even when the text
        // also carries in-scope terms.
        if system == SystemType::Duct && text.contains("liner") {
            return Decision::Exclude("duct liner".to_owned());
        }
        if include_matched && self.config.admitted_systems.contains(&system) {
            return Decision::Admit;
        }
        Decision::Exclude("no matching in-scope keyword".to_owned())
    }

    fn first_hit(&self, keywords: &[String], text: &str) -> Option<String> {
        keywords.iter().find(|kw| text.contains(kw.as_str())).cloned()
    }
}
