//! Version constraints over coerced versions
//!
//! A [`Constraint`] is an AND-combined list of [`Comparator`]s written in the
//! PEP 440 operator vocabulary (`==`, `!=`, `>=`, `<=`, `>`, `<`, `~=`, `===`
//! and the `==X.Y.*` prefix forms). Versions are coerced with
//! [`coerce`](crate::version::semver::coerce) before comparison, so constraints
//! and registry releases live in the same ordering.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use semver::Version;

use crate::version::error::VersionError;
use crate::version::semver::coerce;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Equal,
    ExactEqual,
    NotEqual,
    GreaterThan,
    GreaterThanEqual,
    LessThan,
    LessThanEqual,
    /// `~=`
    Compatible,
    /// `==X.Y.*`
    EqualPrefix,
    /// `!=X.Y.*`
    NotEqualPrefix,
}

impl Operator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Equal | Operator::EqualPrefix => "==",
            Operator::ExactEqual => "===",
            Operator::NotEqual | Operator::NotEqualPrefix => "!=",
            Operator::GreaterThan => ">",
            Operator::GreaterThanEqual => ">=",
            Operator::LessThan => "<",
            Operator::LessThanEqual => "<=",
            Operator::Compatible => "~=",
        }
    }
}

/// Longest spellings first so `===` is not read as `==` followed by `=`.
const OPERATORS: [(&str, Operator); 8] = [
    ("===", Operator::ExactEqual),
    ("==", Operator::Equal),
    ("!=", Operator::NotEqual),
    ("~=", Operator::Compatible),
    (">=", Operator::GreaterThanEqual),
    ("<=", Operator::LessThanEqual),
    (">", Operator::GreaterThan),
    ("<", Operator::LessThan),
];

const OPERATOR_CHARS: [char; 5] = ['<', '>', '=', '!', '~'];

/// A single `operator version` pair
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Comparator {
    pub operator: Operator,
    pub version: Version,
    /// Number of release components written in the source (1 to 3)
    pub precision: usize,
}

impl Comparator {
    fn parse(item: &str, input: &str) -> Result<Self, VersionError> {
        if item.is_empty() {
            return Err(VersionError::invalid(input, "empty comparator"));
        }

        let (operator, token) = OPERATORS
            .iter()
            .find_map(|(spelling, op)| item.strip_prefix(spelling).map(|rest| (*op, rest.trim())))
            .unwrap_or((Operator::Equal, item));

        if token.starts_with(OPERATOR_CHARS) {
            return Err(VersionError::invalid(
                input,
                format!("unknown operator in '{item}'"),
            ));
        }

        let (operator, token) = match token.strip_suffix(".*") {
            Some(prefix) => match operator {
                Operator::Equal => (Operator::EqualPrefix, prefix),
                Operator::NotEqual => (Operator::NotEqualPrefix, prefix),
                _ => {
                    return Err(VersionError::invalid(
                        input,
                        format!("wildcard is only allowed with == and != in '{item}'"),
                    ));
                }
            },
            None => (operator, token),
        };

        let (version, precision) = coerce(token)
            .ok_or_else(|| VersionError::invalid(input, format!("'{token}' is not a version")))?;

        if operator == Operator::Compatible && precision < 2 {
            return Err(VersionError::invalid(
                input,
                "~= needs at least two release components",
            ));
        }

        Ok(Self {
            operator,
            version,
            precision,
        })
    }

    /// Check whether `candidate` satisfies this comparator.
    ///
    /// Build metadata is ignored unless the comparator's own version carries some.
    pub fn matches(&self, candidate: &Version) -> bool {
        let ord = candidate.cmp_precedence(&self.version);
        match self.operator {
            Operator::Equal => self.equals(candidate, ord),
            Operator::NotEqual => !self.equals(candidate, ord),
            Operator::ExactEqual => candidate == &self.version,
            Operator::GreaterThan => ord == Ordering::Greater,
            Operator::GreaterThanEqual => ord != Ordering::Less,
            Operator::LessThan => ord == Ordering::Less,
            Operator::LessThanEqual => ord != Ordering::Greater,
            Operator::Compatible => {
                ord != Ordering::Less && self.release_prefix_matches(candidate, self.precision - 1)
            }
            Operator::EqualPrefix => self.release_prefix_matches(candidate, self.precision),
            Operator::NotEqualPrefix => !self.release_prefix_matches(candidate, self.precision),
        }
    }

    fn equals(&self, candidate: &Version, ord: Ordering) -> bool {
        ord == Ordering::Equal
            && (self.version.build.is_empty() || candidate.build == self.version.build)
    }

    fn release_prefix_matches(&self, candidate: &Version, components: usize) -> bool {
        let lhs = [candidate.major, candidate.minor, candidate.patch];
        let rhs = [self.version.major, self.version.minor, self.version.patch];
        lhs[..components] == rhs[..components]
    }

    fn write_release(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let release = [self.version.major, self.version.minor, self.version.patch];
        let parts: Vec<String> = release[..self.precision]
            .iter()
            .map(u64::to_string)
            .collect();
        write!(f, "{}", parts.join("."))
    }
}

impl fmt::Display for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.operator.as_str())?;
        match self.operator {
            Operator::EqualPrefix | Operator::NotEqualPrefix => {
                self.write_release(f)?;
                f.write_str(".*")
            }
            Operator::Compatible if self.version.pre.is_empty() && self.version.build.is_empty() => {
                self.write_release(f)
            }
            _ => write!(f, "{}", self.version),
        }
    }
}

/// AND-combined list of comparators. An empty constraint accepts every version.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Constraint {
    comparators: Vec<Comparator>,
}

impl Constraint {
    /// Constraint accepting every version
    pub fn any() -> Self {
        Self::default()
    }

    /// Constraint accepting exactly `version` (any build metadata if `version` has none)
    pub fn exact(version: Version) -> Self {
        Self {
            comparators: vec![Comparator {
                operator: Operator::Equal,
                version,
                precision: 3,
            }],
        }
    }

    pub fn parse(raw: &str) -> Result<Self, VersionError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed == "*" {
            return Ok(Self::any());
        }

        let comparators = trimmed
            .split(',')
            .map(|item| Comparator::parse(item.trim(), raw))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { comparators })
    }

    pub fn comparators(&self) -> &[Comparator] {
        &self.comparators
    }

    pub fn matches(&self, candidate: &Version) -> bool {
        self.comparators.iter().all(|c| c.matches(candidate))
    }

    /// Pre-releases are only preferred when the constraint itself names one
    fn allows_prereleases(&self) -> bool {
        self.comparators.iter().any(|c| !c.version.pre.is_empty())
    }

    /// Select the highest candidate satisfying this constraint.
    ///
    /// Stable releases win over pre-releases unless the constraint mentions a
    /// pre-release or only pre-releases satisfy it.
    pub fn select<'a, I>(&self, candidates: I) -> Result<Version, VersionError>
    where
        I: IntoIterator<Item = &'a Version>,
    {
        let matching: Vec<&Version> = candidates
            .into_iter()
            .filter(|v| self.matches(v))
            .collect();

        let best = if self.allows_prereleases() {
            matching.iter().copied().max()
        } else {
            matching
                .iter()
                .copied()
                .filter(|v| v.pre.is_empty())
                .max()
                .or_else(|| matching.iter().copied().max())
        };

        best.cloned()
            .ok_or_else(|| VersionError::NoMatchingVersion {
                constraint: self.to_string(),
            })
    }
}

impl FromStr for Constraint {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.comparators.is_empty() {
            return f.write_str("*");
        }
        for (i, comparator) in self.comparators.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{comparator}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::version::semver::normalize;
    use rstest::rstest;

    fn versions(raw: &[&str]) -> Vec<Version> {
        raw.iter().map(|r| normalize(r)).collect()
    }

    #[rstest]
    #[case(">=2.28.0", "2.32.0", true)]
    #[case(">=2.28.0", "2.27.0", false)]
    #[case("<=2.0.0", "2.0.0", true)]
    #[case("<=2.0.0", "2.0.1", false)]
    #[case(">1.0.0", "1.0.1", true)]
    #[case(">1.0.0", "1.0.0", false)]
    #[case("<2.0.0", "1.9.0", true)]
    #[case("<2.0.0", "2.0.0", false)]
    #[case("==2.0.0", "2.0.0", true)]
    #[case("==2.0", "2.0.0", true)]
    #[case("==2.0.0", "2.0.1", false)]
    #[case("2.0.0", "2.0.0", true)]
    #[case("!=2.0.0", "2.0.1", true)]
    #[case("!=2.0.0", "2.0.0", false)]
    fn matches_basic_operators(#[case] raw: &str, #[case] version: &str, #[case] expected: bool) {
        let constraint = Constraint::parse(raw).unwrap();
        assert_eq!(constraint.matches(&normalize(version)), expected);
    }

    #[rstest]
    #[case("~=1.4.2", "1.4.2", true)]
    #[case("~=1.4.2", "1.4.5", true)]
    #[case("~=1.4.2", "1.5.0", false)]
    #[case("~=1.4.2", "1.4.1", false)]
    #[case("~=1.4", "1.4.0", true)]
    #[case("~=1.4", "1.9.0", true)]
    #[case("~=1.4", "2.0.0", false)]
    fn matches_compatible_release(#[case] raw: &str, #[case] version: &str, #[case] expected: bool) {
        let constraint = Constraint::parse(raw).unwrap();
        assert_eq!(constraint.matches(&normalize(version)), expected);
    }

    #[rstest]
    #[case("==1.4.*", "1.4.0", true)]
    #[case("==1.4.*", "1.4.9", true)]
    #[case("==1.4.*", "1.5.0", false)]
    #[case("!=1.4.*", "1.5.0", true)]
    #[case("!=1.4.*", "1.4.3", false)]
    fn matches_prefix_wildcards(#[case] raw: &str, #[case] version: &str, #[case] expected: bool) {
        let constraint = Constraint::parse(raw).unwrap();
        assert_eq!(constraint.matches(&normalize(version)), expected);
    }

    #[rstest]
    #[case(">=2.0, <3.0", "2.5.0", true)]
    #[case(">=2.0, <3.0", "3.0.0", false)]
    #[case(">=2.0,<3.0", "1.9.0", false)]
    #[case(">=1.0, !=1.5.0", "1.4.0", true)]
    #[case(">=1.0, !=1.5.0", "1.5.0", false)]
    fn matches_compound_constraints(#[case] raw: &str, #[case] version: &str, #[case] expected: bool) {
        let constraint = Constraint::parse(raw).unwrap();
        assert_eq!(constraint.matches(&normalize(version)), expected);
    }

    #[test]
    fn equality_ignores_build_metadata_unless_requested() {
        let post = normalize("1.0.0.post1");
        assert!(Constraint::parse("==1.0.0").unwrap().matches(&post));
        assert!(!Constraint::parse("===1.0.0").unwrap().matches(&post));
        assert!(!Constraint::parse("==1.0.0+post2").unwrap().matches(&post));
    }

    #[rstest]
    #[case("foo>>=1.0")]
    #[case(">>=1.0")]
    #[case(">=")]
    #[case(">=1.0,")]
    #[case(">=1.*")]
    #[case("~=1")]
    #[case("==latest")]
    fn parse_rejects_malformed_constraints(#[case] raw: &str) {
        assert!(matches!(
            Constraint::parse(raw),
            Err(VersionError::InvalidConstraint { .. })
        ));
    }

    #[rstest]
    #[case("", "*")]
    #[case("==1.0", "==1.0.0")]
    #[case(">=2.0, <3.0", ">=2.0.0, <3.0.0")]
    #[case("~=1.4", "~=1.4")]
    #[case("==1.4.*", "==1.4.*")]
    fn display_renders_comparators(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(Constraint::parse(raw).unwrap().to_string(), expected);
    }

    #[test]
    fn select_returns_highest_matching_version() {
        let candidates = versions(&["1.0.0", "1.5.0", "2.0.0", "2.1.0"]);
        let constraint = Constraint::parse(">=1.0, <2.0").unwrap();

        assert_eq!(constraint.select(&candidates).unwrap(), normalize("1.5.0"));
    }

    #[test]
    fn select_with_exact_constraint_returns_that_version() {
        let candidates = versions(&["1.0.0", "1.5.0", "2.0.0"]);
        let constraint = Constraint::exact(normalize("1.0"));

        assert_eq!(constraint.select(&candidates).unwrap(), normalize("1.0.0"));
    }

    #[test]
    fn select_with_any_constraint_returns_newest_stable() {
        let candidates = versions(&["1.0.0", "2.0.0", "3.0.0b1"]);

        assert_eq!(Constraint::any().select(&candidates).unwrap(), normalize("2.0.0"));
    }

    #[test]
    fn select_accepts_prerelease_when_constraint_names_one() {
        let candidates = versions(&["1.0.0", "2.0.0b1", "2.0.0b2"]);
        let constraint = Constraint::parse(">=2.0.0b1").unwrap();

        assert_eq!(constraint.select(&candidates).unwrap(), normalize("2.0.0b2"));
    }

    #[test]
    fn select_falls_back_to_prerelease_when_nothing_stable_matches() {
        let candidates = versions(&["1.0.0", "2.0.0rc1"]);
        let constraint = Constraint::parse(">1.0").unwrap();

        assert_eq!(constraint.select(&candidates).unwrap(), normalize("2.0.0rc1"));
    }

    #[test]
    fn select_fails_when_no_candidate_matches() {
        let candidates = versions(&["1.0.0", "1.5.0"]);
        let constraint = Constraint::parse(">=2.0").unwrap();

        assert!(matches!(
            constraint.select(&candidates),
            Err(VersionError::NoMatchingVersion { .. })
        ));
    }

    #[test]
    fn select_fails_on_empty_candidates() {
        let candidates: Vec<Version> = Vec::new();
        assert!(matches!(
            Constraint::any().select(&candidates),
            Err(VersionError::NoMatchingVersion { .. })
        ));
    }

    #[test]
    fn select_never_returns_a_version_outside_the_constraint() {
        let candidates = versions(&[
            "0.1", "0.9.9", "1.0", "1.0.1", "1.4.2", "1.4.7", "1.5b1", "2.0", "2.0.1", "3.0a1",
        ]);
        let constraints = [
            ">=1.0", "<1.0", "~=1.4.2", "==1.4.*", "!=2.0", ">0.9, <2.0", "==3.0a1", ">=2.0.1",
        ];

        for raw in constraints {
            let constraint = Constraint::parse(raw).unwrap();
            let selected = constraint.select(&candidates).unwrap();
            assert!(constraint.matches(&selected), "{raw} selected {selected}");
        }
    }
}
