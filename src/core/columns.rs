//! Column names recognized in pVACtools result tables.
//!
//! Each table kind has a whitelist of columns a caller may compare, a
//! default comparison list, and the ordered identity columns used to build
//! row keys. Column names drift between pipeline versions; the alias table
//! maps historical spellings onto the current canonical name.

/// Columns combined as `Gene (AAChange)` when identity columns are missing
pub const FALLBACK_IDENTITY_COLUMNS: (&str, &str) = ("Gene", "AA Change");

pub const AGGREGATED_IDENTITY_COLUMNS: &[&str] = &["ID"];

pub const UNAGGREGATED_IDENTITY_COLUMNS: &[&str] = &[
    "Chromosome",
    "Start",
    "Stop",
    "Reference",
    "Variant",
    "Transcript",
    "HLA Allele",
    "MT Epitope Seq",
    "Index",
];

pub const REFERENCE_MATCH_IDENTITY_COLUMNS: &[&str] = &[
    "Chromosome",
    "Start",
    "Stop",
    "Reference",
    "Variant",
    "Transcript",
    "MT Epitope Seq",
    "Hit ID",
    "Match Start",
    "Match Stop",
];

pub const VALID_AGGREGATED_COLUMNS: &[&str] = &[
    "Gene",
    "AA Change",
    "Num Passing Transcripts",
    "Best Peptide",
    "Best Transcript",
    "Num Passing Peptides",
    "IC50 MT",
    "IC50 WT",
    "%ile MT",
    "%ile WT",
    "RNA Expr",
    "RNA VAF",
    "DNA VAF",
    "Tier",
];

pub const VALID_UNAGGREGATED_COLUMNS: &[&str] = &[
    "Biotype",
    "Sub-peptide Position",
    "Median MT IC50 Score",
    "Median WT IC50 Score",
    "Median MT Percentile",
    "Median WT Percentile",
    "WT Epitope Seq",
    "Tumor DNA VAF",
    "Tumor RNA Depth",
    "Tumor RNA VAF",
    "Gene Expression",
    "BigMHC_EL WT Score",
    "BigMHC_EL MT Score",
    "BigMHC_IM WT Score",
    "BigMHC_IM MT Score",
    "MHCflurryEL Processing WT Score",
    "MHCflurryEL Processing MT Score",
    "MHCflurryEL Presentation WT Score",
    "MHCflurryEL Presentation MT Score",
    "MHCflurryEL Presentation WT Percentile",
    "MHCflurryEL Presentation MT Percentile",
    "MHCflurry WT IC50 Score",
    "MHCflurry MT IC50 Score",
    "MHCflurry WT Percentile",
    "MHCflurry MT Percentile",
    "MHCnuggetsI WT IC50 Score",
    "MHCnuggetsI MT IC50 Score",
    "MHCnuggetsI WT Percentile",
    "MHCnuggetsI MT Percentile",
    "NetMHC WT IC50 Score",
    "NetMHC MT IC50 Score",
    "NetMHC WT Percentile",
    "NetMHC MT Percentile",
    "NetMHCcons WT IC50 Score",
    "NetMHCcons MT IC50 Score",
    "NetMHCcons WT Percentile",
    "NetMHCcons MT Percentile",
    "NetMHCpan WT IC50 Score",
    "NetMHCpan MT IC50 Score",
    "NetMHCpan WT Percentile",
    "NetMHCpan MT Percentile",
    "NetMHCpanEL WT Score",
    "NetMHCpanEL MT Score",
    "NetMHCpanEL WT Percentile",
    "NetMHCpanEL MT Percentile",
    "PickPocket WT IC50 Score",
    "PickPocket MT IC50 Score",
    "PickPocket WT Percentile",
    "PickPocket MT Percentile",
    "SMM WT IC50 Score",
    "SMM MT IC50 Score",
    "SMM WT Percentile",
    "SMM MT Percentile",
    "SMMPMBEC WT IC50 Score",
    "SMMPMBEC MT IC50 Score",
    "SMMPMBEC WT Percentile",
    "SMMPMBEC MT Percentile",
    "DeepImmuno WT Score",
    "DeepImmuno MT Score",
    "Problematic Positions",
];

pub const VALID_REFERENCE_MATCH_COLUMNS: &[&str] =
    &["Peptide", "Hit Definition", "Match Window", "Match Sequence"];

pub const DEFAULT_AGGREGATED_COLUMNS: &[&str] = &[
    "Num Passing Transcripts",
    "Best Peptide",
    "Best Transcript",
    "Num Passing Peptides",
    "Tier",
];

pub const DEFAULT_UNAGGREGATED_COLUMNS: &[&str] = &[
    "Biotype",
    "Sub-peptide Position",
    "Median MT IC50 Score",
    "Median WT IC50 Score",
    "Median MT Percentile",
    "Median WT Percentile",
    "WT Epitope Seq",
    "Tumor DNA VAF",
    "Tumor RNA Depth",
    "Tumor RNA VAF",
    "Gene Expression",
];

pub const DEFAULT_REFERENCE_MATCH_COLUMNS: &[&str] = &["Peptide", "Match Window"];

/// Canonical column name and the spellings older pipeline versions used for it
pub const COLUMN_ALIASES: &[(&str, &[&str])] = &[
    ("Best Peptide", &["best peptide", "best_peptide"]),
    ("Best Transcript", &["best transcript", "best_transcript"]),
    ("Tier", &["tier"]),
    ("AA Change", &["AA_change"]),
    ("Num Passing Transcripts", &["Num_Transcript"]),
    ("Num Passing Peptides", &["Num_Peptides"]),
];

/// Canonical name for a column, if `name` is a known alias
#[must_use]
pub fn canonical_name(name: &str) -> Option<&'static str> {
    COLUMN_ALIASES
        .iter()
        .find(|(_, aliases)| aliases.contains(&name))
        .map(|(canonical, _)| *canonical)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_name() {
        assert_eq!(canonical_name("best_peptide"), Some("Best Peptide"));
        assert_eq!(canonical_name("tier"), Some("Tier"));
        assert_eq!(canonical_name("Tier"), None);
        assert_eq!(canonical_name("Unrelated"), None);
    }

    #[test]
    fn test_defaults_are_valid() {
        for col in DEFAULT_AGGREGATED_COLUMNS {
            assert!(VALID_AGGREGATED_COLUMNS.contains(col));
        }
        for col in DEFAULT_UNAGGREGATED_COLUMNS {
            assert!(VALID_UNAGGREGATED_COLUMNS.contains(col));
        }
        for col in DEFAULT_REFERENCE_MATCH_COLUMNS {
            assert!(VALID_REFERENCE_MATCH_COLUMNS.contains(col));
        }
    }
}
