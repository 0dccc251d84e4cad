use chrono::{Months, NaiveDate};
use std::collections::BTreeSet;

use crate::core::tagset::contains_any;
use crate::models::{
    BooleanField, BooleanVocabulary, CandidateProfile, CategoricalField, NumericField, QueryParams,
    Vocabularies, Vocabulary,
};

const AGE_KEYS: &[&str] = &["age", "idade"];
const AREA_KEYS: &[&str] = &["area_atuacao", "areas_atuacao", "areas"];
const SEARCH_KEYS: &[&str] = &["q", "search"];
const MULTI_SUFFIX: &str = "__in";

/// One compiled constraint over a candidate.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterClause {
    /// Birth date on or before the bound (minimum age).
    BornOnOrBefore(NaiveDate),
    /// Birth date strictly after the bound (maximum age).
    BornAfter(NaiveDate),
    AtLeast(NumericField, f64),
    AtMost(NumericField, f64),
    /// Lowercased accepted spellings (tokens and labels).
    OneOf(CategoricalField, BTreeSet<String>),
    FlagIn(BooleanField, BTreeSet<bool>),
    /// Any of the tokens appears as a whole tag.
    AreasContainAny(Vec<String>),
    /// Lowercased needle over name, digits over phone.
    Search(String),
}

impl FilterClause {
    pub fn matches(&self, candidate: &CandidateProfile) -> bool {
        match self {
            FilterClause::BornOnOrBefore(bound) => candidate.birth_date.is_some_and(|d| d <= *bound),
            FilterClause::BornAfter(bound) => candidate.birth_date.is_some_and(|d| d > *bound),
            FilterClause::AtLeast(field, min) => field.value_of(candidate).is_some_and(|v| v >= *min),
            FilterClause::AtMost(field, max) => field.value_of(candidate).is_some_and(|v| v <= *max),
            FilterClause::OneOf(field, accepted) => field
                .value_of(candidate)
                .is_some_and(|v| accepted.contains(&v.trim().to_lowercase())),
            FilterClause::FlagIn(field, accepted) => {
                field.value_of(candidate).is_some_and(|v| accepted.contains(&v))
            }
            FilterClause::AreasContainAny(tokens) => contains_any(&candidate.areas, tokens),
            FilterClause::Search(needle) => matches_search(candidate, needle),
        }
    }
}

/// Conjunction of compiled clauses; an empty filter accepts everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CandidateFilter {
    clauses: Vec<FilterClause>,
}

impl CandidateFilter {
    pub fn new(clauses: Vec<FilterClause>) -> Self {
        Self { clauses }
    }

    pub fn clauses(&self) -> &[FilterClause] {
        &self.clauses
    }

    pub fn is_unconstrained(&self) -> bool {
        self.clauses.is_empty()
    }

    #[inline]
    pub fn matches(&self, candidate: &CandidateProfile) -> bool {
        self.clauses.iter().all(|clause| clause.matches(candidate))
    }

    /// Combine with another filter; both must hold.
    pub fn and(mut self, other: CandidateFilter) -> Self {
        self.clauses.extend(other.clauses);
        self
    }

    pub fn apply<'a, I>(&self, candidates: I) -> Vec<&'a CandidateProfile>
    where
        I: IntoIterator<Item = &'a CandidateProfile>,
    {
        candidates.into_iter().filter(|c| self.matches(c)).collect()
    }
}

/// Compile query parameters into a candidate filter
///
/// Recognised shapes (English or Portuguese keys):
/// - `age_min` / `age_max`            whole years, relative to `today`
/// - `<numeric>_min` / `<numeric>_max` decimal comma or point
/// - `<field>__in=a,b;c|d`            multi-select, OR within the list
/// - `<field>=value`                  single-value equality
/// - `area_atuacao=a,b`               whole-tag containment, OR within the list
/// - `q=text`                         name or phone search
///
/// Unparseable values and unknown keys are skipped, never rejected.
pub fn compile_filters(params: &QueryParams, today: NaiveDate, vocabularies: &Vocabularies) -> CandidateFilter {
    let mut clauses = Vec::new();

    compile_age(params, today, &mut clauses);

    for field in NumericField::ALL {
        if let Some((key, raw)) = params.first_present(&suffixed(field.keys(), "_min")) {
            match parse_decimal(raw) {
                Some(min) => clauses.push(FilterClause::AtLeast(field, min)),
                None => tracing::debug!(param = key, value = raw, "ignoring unparseable bound"),
            }
        }
        if let Some((key, raw)) = params.first_present(&suffixed(field.keys(), "_max")) {
            match parse_decimal(raw) {
                Some(max) => clauses.push(FilterClause::AtMost(field, max)),
                None => tracing::debug!(param = key, value = raw, "ignoring unparseable bound"),
            }
        }
    }

    for field in CategoricalField::ALL {
        let vocabulary = vocabularies.for_field(field);
        if let Some((_, raw)) = params.first_present(&suffixed(field.keys(), MULTI_SUFFIX)) {
            let accepted = accepted_spellings(vocabulary, split_multi(raw).iter().map(String::as_str));
            if !accepted.is_empty() {
                clauses.push(FilterClause::OneOf(field, accepted));
            }
        }
        if let Some((_, raw)) = params.first_present(&suffixed(field.keys(), "")) {
            clauses.push(FilterClause::OneOf(field, accepted_spellings(vocabulary, [raw])));
        }
    }

    for field in BooleanField::ALL {
        if let Some((key, raw)) = params.first_present(&suffixed(field.keys(), MULTI_SUFFIX)) {
            let accepted = parse_bool_tokens(raw, &vocabularies.boolean);
            if accepted.is_empty() {
                tracing::debug!(param = key, value = raw, "no recognised yes/no values, filter skipped");
            } else {
                clauses.push(FilterClause::FlagIn(field, accepted));
            }
        }
        if let Some((key, raw)) = params.first_present(&suffixed(field.keys(), "")) {
            match vocabularies.boolean.parse(raw) {
                Some(flag) => clauses.push(FilterClause::FlagIn(field, BTreeSet::from([flag]))),
                None => tracing::debug!(param = key, value = raw, "unrecognised yes/no value, filter skipped"),
            }
        }
    }

    if let Some((_, raw)) = params.first_present(&suffixed(AREA_KEYS, "")) {
        let tokens = area_spellings(&vocabularies.areas, &split_multi(raw));
        if !tokens.is_empty() {
            clauses.push(FilterClause::AreasContainAny(tokens));
        }
    }

    if let Some((_, raw)) = params.first_present(&suffixed(SEARCH_KEYS, "")) {
        clauses.push(FilterClause::Search(raw.to_lowercase()));
    }

    for key in params.keys().filter(|key| !is_recognized(key)) {
        tracing::trace!(param = key, "ignoring unknown filter parameter");
    }

    tracing::debug!(clauses = clauses.len(), "compiled candidate filter");
    CandidateFilter::new(clauses)
}

fn compile_age(params: &QueryParams, today: NaiveDate, clauses: &mut Vec<FilterClause>) {
    if let Some((key, raw)) = params.first_present(&suffixed(AGE_KEYS, "_min")) {
        match raw.parse::<i32>().ok().and_then(|years| years_before(today, years)) {
            Some(bound) => clauses.push(FilterClause::BornOnOrBefore(bound)),
            None => tracing::debug!(param = key, value = raw, "ignoring unparseable age bound"),
        }
    }
    if let Some((key, raw)) = params.first_present(&suffixed(AGE_KEYS, "_max")) {
        let bound = raw
            .parse::<i32>()
            .ok()
            .and_then(|years| years.checked_add(1))
            .and_then(|years| years_before(today, years));
        match bound {
            Some(bound) => clauses.push(FilterClause::BornAfter(bound)),
            None => tracing::debug!(param = key, value = raw, "ignoring unparseable age bound"),
        }
    }
}

/// `today` shifted back by whole calendar years.
///
/// February 29th clamps to February 28th in non-leap target years.
pub fn years_before(today: NaiveDate, years: i32) -> Option<NaiveDate> {
    let months = Months::new(years.unsigned_abs().checked_mul(12)?);
    if years >= 0 {
        today.checked_sub_months(months)
    } else {
        today.checked_add_months(months)
    }
}

/// Parse a decimal that may use a comma separator (`"1,75"`).
pub fn parse_decimal(raw: &str) -> Option<f64> {
    let normalized = raw.trim().replace(',', ".");
    if normalized.is_empty() {
        return None;
    }
    normalized.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Split a multi-select value on `,` `;` or `|`, trimmed and de-duplicated in order.
pub fn split_multi(raw: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for piece in raw.split([',', ';', '|']).map(str::trim).filter(|p| !p.is_empty()) {
        if !out.iter().any(|seen| seen == piece) {
            out.push(piece.to_string());
        }
    }
    out
}

/// Recognised yes/no values of a multi-select; unrecognised tokens are dropped.
pub fn parse_bool_tokens(raw: &str, vocabulary: &BooleanVocabulary) -> BTreeSet<bool> {
    split_multi(raw).iter().filter_map(|token| vocabulary.parse(token)).collect()
}

fn accepted_spellings<'a, I>(vocabulary: &Vocabulary, values: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut accepted = BTreeSet::new();
    for value in values {
        accepted.insert(value.trim().to_lowercase());
        if let Some(token) = vocabulary.canonicalize(value) {
            accepted.insert(token.to_lowercase());
            if let Some(label) = vocabulary.label_of(token) {
                accepted.insert(label.to_lowercase());
            }
        }
    }
    accepted
}

/// Canonical token and label for each queried area, or the raw text when unknown.
fn area_spellings(vocabulary: &Vocabulary, values: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    let mut push = |spelling: &str| {
        if !out.iter().any(|seen| seen.eq_ignore_ascii_case(spelling)) {
            out.push(spelling.to_string());
        }
    };
    for value in values {
        match vocabulary.canonicalize(value) {
            Some(token) => {
                push(token);
                if let Some(label) = vocabulary.label_of(token) {
                    push(label);
                }
            }
            None => push(value),
        }
    }
    out
}

fn matches_search(candidate: &CandidateProfile, needle: &str) -> bool {
    if candidate.name.to_lowercase().contains(needle) {
        return true;
    }
    let needle_digits = digits(needle);
    !needle_digits.is_empty()
        && candidate
            .phone
            .as_deref()
            .is_some_and(|phone| digits(phone).contains(&needle_digits))
}

fn digits(value: &str) -> String {
    value.chars().filter(char::is_ascii_digit).collect()
}

fn suffixed(keys: &[&str], suffix: &str) -> Vec<String> {
    keys.iter().map(|key| format!("{}{}", key, suffix)).collect()
}

fn is_recognized(key: &str) -> bool {
    let base = key.strip_suffix("_min").or_else(|| key.strip_suffix("_max"));
    if let Some(base) = base {
        if AGE_KEYS.contains(&base) || NumericField::ALL.iter().any(|f| f.keys().contains(&base)) {
            return true;
        }
    }

    let base = key.strip_suffix(MULTI_SUFFIX).unwrap_or(key);
    CategoricalField::ALL.iter().any(|f| f.keys().contains(&base))
        || BooleanField::ALL.iter().any(|f| f.keys().contains(&base))
        || AREA_KEYS.contains(&key)
        || SEARCH_KEYS.contains(&key)
}
