//! Human labels for flat-file field codes

/// Known field codes and their labels, sorted by code
pub const FIELD_LABELS: &[(&str, &str)] = &[
    ("AC", "activating compound"),
    ("AP", "application"),
    ("BR", "BRENDA release"),
    ("CF", "cofactor"),
    ("CL", "cloned"),
    ("CR", "crystallization"),
    ("EN", "engineering"),
    ("EXP", "expression"),
    ("GI", "general information"),
    ("GS", "general stability"),
    ("IC50", "IC50 value"),
    ("ID", "EC class"),
    ("IN", "inhibitor"),
    ("KI", "Ki value"),
    ("KKM", "kcat/KM value"),
    ("KM", "Km value"),
    ("LO", "localization"),
    ("ME", "metals/ions"),
    ("MW", "molecular weight"),
    ("NSP", "natural substrates/products"),
    ("OS", "oxygen stability"),
    ("OSS", "organic solvent stability"),
    ("PHO", "pH optimum"),
    ("PHR", "pH range"),
    ("PHS", "pH stability"),
    ("PI", "isoelectric point"),
    ("PM", "post translational modification"),
    ("PR", "protein"),
    ("PU", "purification"),
    ("RE", "reaction"),
    ("REN", "renatured"),
    ("RF", "reference"),
    ("RN", "recommended name"),
    ("RT", "reaction type"),
    ("SA", "specific activity"),
    ("SN", "synonym"),
    ("SP", "substrate/product"),
    ("SS", "storage stability"),
    ("ST", "source tissue"),
    ("SU", "subunits"),
    ("SY", "systematic name"),
    ("TN", "turnover number"),
    ("TO", "temperature optimum"),
    ("TR", "temperature range"),
    ("TS", "temperature stability"),
];

/// Label for a field code; unknown codes have none
pub fn field_label(code: &str) -> Option<&'static str> {
    FIELD_LABELS
        .binary_search_by(|(known, _)| (*known).cmp(code))
        .ok()
        .map(|index| FIELD_LABELS[index].1)
}
