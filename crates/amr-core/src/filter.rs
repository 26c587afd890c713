//! Case selection by organism, demographics and origin.

use std::fmt;
use std::str::FromStr;

use amr_ingest::CaseSchema;
use amr_model::OrganismGroup;
use amr_standards::ReferenceTables;
use polars::prelude::{BooleanChunked, DataFrame, NewChunkedArray};
use serde::Serialize;
use tracing::debug;

use crate::error::Result;
use crate::frame::role_values;

/// Clinical age groups, each a half-open interval in years.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AgeGroup {
    /// 0 to 11.
    Paediatric,
    /// 12 to 17.
    Adolescent,
    /// 18 to 59.
    Adult,
    /// 60 to 119.
    Elderly,
}

impl AgeGroup {
    pub fn of(age: f64) -> Option<Self> {
        match age {
            a if (0.0..12.0).contains(&a) => Some(AgeGroup::Paediatric),
            a if (12.0..18.0).contains(&a) => Some(AgeGroup::Adolescent),
            a if (18.0..60.0).contains(&a) => Some(AgeGroup::Adult),
            a if (60.0..120.0).contains(&a) => Some(AgeGroup::Elderly),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AgeGroup::Paediatric => "Pediátrico",
            AgeGroup::Adolescent => "Adolescente",
            AgeGroup::Adult => "Adulto",
            AgeGroup::Elderly => "Idoso",
        }
    }
}

impl fmt::Display for AgeGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for AgeGroup {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pediátrico" | "pediatrico" | "paediatric" | "pediatric" => Ok(AgeGroup::Paediatric),
            "adolescente" | "adolescent" => Ok(AgeGroup::Adolescent),
            "adulto" | "adult" => Ok(AgeGroup::Adult),
            "idoso" | "elderly" => Ok(AgeGroup::Elderly),
            _ => Err(format!("Unknown age group: {s}")),
        }
    }
}

/// Parse an age cell; `"34"`, `"34.0"` and `"34 anos"` all read as 34.
pub(crate) fn parse_age(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    let numeric: String = trimmed
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.' || *c == ',')
        .map(|c| if c == ',' { '.' } else { c })
        .collect();
    numeric.parse::<f64>().ok().filter(|age| age.is_finite())
}

/// Conjunction of optional criteria; an empty filter keeps every row.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CaseFilter {
    /// Keep records of any of these organisms; empty keeps every organism.
    pub organisms: Vec<String>,
    pub group: OrganismGroup,
    /// Keep only organisms on the relevant-organism list.
    pub relevant_only: bool,
    pub sex: Option<String>,
    pub age_group: Option<AgeGroup>,
    pub service: Option<String>,
    pub product: Option<String>,
}

impl CaseFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_organism(mut self, organism: impl Into<String>) -> Self {
        self.organisms.push(organism.into().trim().to_string());
        self
    }

    pub fn with_organisms<I, S>(self, organisms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        organisms
            .into_iter()
            .fold(self, |filter, organism| filter.with_organism(organism))
    }

    pub fn with_group(mut self, group: OrganismGroup) -> Self {
        self.group = group;
        self
    }

    pub fn with_relevant_only(mut self, enable: bool) -> Self {
        self.relevant_only = enable;
        self
    }

    pub fn with_sex(mut self, sex: impl Into<String>) -> Self {
        self.sex = Some(sex.into());
        self
    }

    pub fn with_age_group(mut self, age_group: AgeGroup) -> Self {
        self.age_group = Some(age_group);
        self
    }

    pub fn with_service(mut self, service: impl Into<String>) -> Self {
        self.service = Some(service.into());
        self
    }

    pub fn with_product(mut self, product: impl Into<String>) -> Self {
        self.product = Some(product.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.organisms.is_empty()
            && self.group == OrganismGroup::All
            && !self.relevant_only
            && self.sex.is_none()
            && self.age_group.is_none()
            && self.service.is_none()
            && self.product.is_none()
    }

    /// Row mask over `df`. A criterion on an absent column matches nothing.
    pub fn mask(&self, df: &DataFrame, schema: &CaseSchema, tables: &ReferenceTables) -> Vec<bool> {
        let mut keep = vec![true; df.height()];
        let organisms = role_values(df, schema.organism.as_deref());

        if !self.organisms.is_empty() {
            restrict(&mut keep, &organisms, |value| {
                self.organisms.iter().any(|wanted| wanted == value)
            });
        }
        if self.group != OrganismGroup::All {
            restrict(&mut keep, &organisms, |value| tables.in_group(value, self.group));
        }
        if self.relevant_only {
            restrict(&mut keep, &organisms, |value| tables.is_relevant_organism(value));
        }
        if let Some(wanted) = self.sex.as_deref() {
            let values = role_values(df, schema.sex.as_deref());
            restrict(&mut keep, &values, |value| value.eq_ignore_ascii_case(wanted.trim()));
        }
        if let Some(group) = self.age_group {
            let values = role_values(df, schema.age.as_deref());
            restrict(&mut keep, &values, |value| {
                parse_age(value).and_then(AgeGroup::of) == Some(group)
            });
        }
        if let Some(wanted) = self.service.as_deref() {
            let values = role_values(df, schema.service.as_deref());
            restrict(&mut keep, &values, |value| value == wanted.trim());
        }
        if let Some(wanted) = self.product.as_deref() {
            let values = role_values(df, schema.product.as_deref());
            restrict(&mut keep, &values, |value| value == wanted.trim());
        }
        keep
    }

    /// Rows of `df` matching every criterion.
    pub fn apply(
        &self,
        df: &DataFrame,
        schema: &CaseSchema,
        tables: &ReferenceTables,
    ) -> Result<DataFrame> {
        if self.is_empty() {
            return Ok(df.clone());
        }
        let keep = self.mask(df, schema, tables);
        let mask = BooleanChunked::from_slice("filter".into(), &keep);
        let filtered = df.filter(&mask)?;
        debug!(
            rows_before = df.height(),
            rows_after = filtered.height(),
            "case filter applied"
        );
        Ok(filtered)
    }
}

fn restrict(keep: &mut [bool], values: &[Option<String>], matches: impl Fn(&str) -> bool) {
    for (flag, value) in keep.iter_mut().zip(values) {
        *flag = *flag && value.as_deref().is_some_and(&matches);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn age_groups_are_half_open() {
        assert_eq!(AgeGroup::of(11.9), Some(AgeGroup::Paediatric));
        assert_eq!(AgeGroup::of(12.0), Some(AgeGroup::Adolescent));
        assert_eq!(AgeGroup::of(60.0), Some(AgeGroup::Elderly));
        assert_eq!(AgeGroup::of(120.0), None);
        assert_eq!(AgeGroup::of(-1.0), None);
    }

    #[test]
    fn parses_age_text() {
        assert_eq!(parse_age("34"), Some(34.0));
        assert_eq!(parse_age(" 7,5 "), Some(7.5));
        assert_eq!(parse_age("81 anos"), Some(81.0));
        assert_eq!(parse_age("desconhecida"), None);
    }
}
