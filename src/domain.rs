use std::fmt;
use std::str::FromStr;

use regex::Regex;

use crate::error::KeggError;

/// KEGG organism code, e.g. `hsa` or `eco`. Passed through to the remote
/// service verbatim; an unknown code surfaces as a service-side error.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OrganismCode(String);

impl OrganismCode {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrganismCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for OrganismCode {
    type Err = KeggError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_string();
        if normalized.is_empty() || normalized.chars().any(|ch| ch.is_whitespace()) {
            return Err(KeggError::InvalidOrganism(value.to_string()));
        }
        Ok(Self(normalized))
    }
}

/// Five-digit numeric pathway suffix, used to name output files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathwayNumber(String);

impl PathwayNumber {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PathwayNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Canonical compound token, `C` followed by five digits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompoundId(String);

impl CompoundId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CompoundId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Canonical reaction token, `R` followed by five digits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReactionId(String);

impl ReactionId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ReactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Extraction patterns for one run. The pathway pattern embeds the requested
/// organism, so a reference for a different organism fails to match.
pub struct IdPatterns {
    organism: String,
    pathway: Regex,
    compound: Regex,
    reaction: Regex,
}

impl IdPatterns {
    pub fn for_organism(organism: &OrganismCode) -> Self {
        let pathway = Regex::new(&format!(
            r"^path:{}(\d{{5}})$",
            regex::escape(organism.as_str())
        ))
        .unwrap();
        let compound = Regex::new(r"^cpd:(C\d{5})$").unwrap();
        let reaction = Regex::new(r"^rn:(R\d{5})$").unwrap();
        Self {
            organism: organism.as_str().to_string(),
            pathway,
            compound,
            reaction,
        }
    }

    pub fn pathway_number(&self, raw: &str) -> Result<PathwayNumber, KeggError> {
        let captures = self.pathway.captures(raw).ok_or_else(|| KeggError::Parse {
            raw: raw.to_string(),
            expected: format!("path:{}<5 digits>", self.organism),
        })?;
        Ok(PathwayNumber(captures[1].to_string()))
    }

    pub fn compound_id(&self, raw: &str) -> Result<CompoundId, KeggError> {
        let captures = self.compound.captures(raw).ok_or_else(|| KeggError::Parse {
            raw: raw.to_string(),
            expected: "cpd:C<5 digits>".to_string(),
        })?;
        Ok(CompoundId(captures[1].to_string()))
    }

    pub fn reaction_id(&self, raw: &str) -> Result<ReactionId, KeggError> {
        let captures = self.reaction.captures(raw).ok_or_else(|| KeggError::Parse {
            raw: raw.to_string(),
            expected: "rn:R<5 digits>".to_string(),
        })?;
        Ok(ReactionId(captures[1].to_string()))
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn parse_organism_code_valid() {
        let code: OrganismCode = " hsa ".parse().unwrap();
        assert_eq!(code.as_str(), "hsa");
    }

    #[test]
    fn parse_organism_code_invalid() {
        let err = "".parse::<OrganismCode>().unwrap_err();
        assert_matches!(err, KeggError::InvalidOrganism(_));
        let err = "h sa".parse::<OrganismCode>().unwrap_err();
        assert_matches!(err, KeggError::InvalidOrganism(_));
    }

    #[test]
    fn pathway_number_extraction() {
        let organism: OrganismCode = "hsa".parse().unwrap();
        let patterns = IdPatterns::for_organism(&organism);
        let number = patterns.pathway_number("path:hsa00010").unwrap();
        assert_eq!(number.as_str(), "00010");
    }

    #[test]
    fn pathway_number_rejects_other_organism() {
        let organism: OrganismCode = "hsa".parse().unwrap();
        let patterns = IdPatterns::for_organism(&organism);
        let err = patterns.pathway_number("path:eco00010").unwrap_err();
        assert_matches!(err, KeggError::Parse { .. });
    }

    #[test]
    fn compound_extraction() {
        let organism: OrganismCode = "hsa".parse().unwrap();
        let patterns = IdPatterns::for_organism(&organism);
        let id = patterns.compound_id("cpd:C00031").unwrap();
        assert_eq!(id.as_str(), "C00031");
    }

    #[test]
    fn compound_wrong_letter_rejected() {
        let organism: OrganismCode = "hsa".parse().unwrap();
        let patterns = IdPatterns::for_organism(&organism);
        let err = patterns.compound_id("cpd:X99999").unwrap_err();
        assert_matches!(err, KeggError::Parse { raw, .. } if raw == "cpd:X99999");
    }

    #[test]
    fn reaction_extraction() {
        let organism: OrganismCode = "hsa".parse().unwrap();
        let patterns = IdPatterns::for_organism(&organism);
        let id = patterns.reaction_id("rn:R00200").unwrap();
        assert_eq!(id.as_str(), "R00200");
        let err = patterns.reaction_id("R00200").unwrap_err();
        assert_matches!(err, KeggError::Parse { .. });
    }

    #[test]
    fn trailing_garbage_rejected() {
        let organism: OrganismCode = "hsa".parse().unwrap();
        let patterns = IdPatterns::for_organism(&organism);
        assert!(patterns.compound_id("cpd:C000312").is_err());
        assert!(patterns.reaction_id("rn:R0020").is_err());
        assert!(patterns.pathway_number("path:hsa00010x").is_err());
    }
}
