use std::fmt::{Display, Formatter};

use bintab_error::{BintabResult, bintab_err};
use serde::{Deserialize, Serialize};

/// The value of a named table attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Attribute {
    /// A boolean.
    Logical(bool),
    /// A signed integer.
    Integer(i64),
    /// An unsigned integer too large for [`Attribute::Integer`], e.g. the bias of a 64-bit column.
    Unsigned(u64),
    /// A floating point number.
    Real(f64),
    /// A string.
    Text(String),
}

impl Attribute {
    /// The value as an exact integer. Reals qualify only when they have no fractional part.
    pub fn as_i128(&self) -> Option<i128> {
        match self {
            Self::Integer(v) => Some(i128::from(*v)),
            Self::Unsigned(v) => Some(i128::from(*v)),
            #[allow(clippy::cast_possible_truncation)]
            Self::Real(v) if v.fract() == 0.0 && v.abs() < 1e38 => Some(*v as i128),
            _ => None,
        }
    }

    /// The value as an `i64`, if it is an integer in range.
    pub fn as_i64(&self) -> Option<i64> {
        self.as_i128().and_then(|v| i64::try_from(v).ok())
    }

    /// The text of a [`Attribute::Text`].
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl Display for Attribute {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Logical(v) => write!(f, "{}", if *v { "T" } else { "F" }),
            Self::Integer(v) => write!(f, "{v}"),
            Self::Unsigned(v) => write!(f, "{v}"),
            Self::Real(v) => write!(f, "{v:?}"),
            Self::Text(v) => write!(f, "'{v}'"),
        }
    }
}

/// Keyed storage for table attributes (header keywords).
pub trait AttributeStore {
    /// Returns the attribute, or a [`NotFound`][bintab_error::BintabError::NotFound] error.
    fn get(&self, name: &str) -> BintabResult<Attribute>;

    /// Inserts or replaces an attribute.
    fn set(
        &mut self,
        name: &str,
        value: Attribute,
        comment: Option<&str>,
        unit: Option<&str>,
    ) -> BintabResult<()>;
}

impl<S: AttributeStore + ?Sized> AttributeStore for &mut S {
    fn get(&self, name: &str) -> BintabResult<Attribute> {
        (**self).get(name)
    }

    fn set(
        &mut self,
        name: &str,
        value: Attribute,
        comment: Option<&str>,
        unit: Option<&str>,
    ) -> BintabResult<()> {
        (**self).set(name, value, comment, unit)
    }
}

/// One stored attribute together with its comment and unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    /// Attribute name.
    pub name: String,
    /// Attribute value.
    pub value: Attribute,
    /// Free-form comment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    /// Physical unit of the value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

/// An ordered set of attributes, as kept by the bundled stores.
///
/// Insertion order is preserved; setting an existing name replaces it in place.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Header {
    cards: Vec<Card>,
}

impl Header {
    /// All attributes in insertion order.
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Looks up the full card of an attribute.
    pub fn card(&self, name: &str) -> Option<&Card> {
        self.cards.iter().find(|card| card.name == name)
    }
}

impl AttributeStore for Header {
    fn get(&self, name: &str) -> BintabResult<Attribute> {
        self.card(name)
            .map(|card| card.value.clone())
            .ok_or_else(|| bintab_err!(NotFound: "attribute {}", name))
    }

    fn set(
        &mut self,
        name: &str,
        value: Attribute,
        comment: Option<&str>,
        unit: Option<&str>,
    ) -> BintabResult<()> {
        let card = Card {
            name: name.to_string(),
            value,
            comment: comment.map(str::to_string),
            unit: unit.map(str::to_string),
        };
        match self.cards.iter_mut().find(|c| c.name == name) {
            Some(existing) => *existing = card,
            None => self.cards.push(card),
        }
        Ok(())
    }
}

/// Names of the per-column attributes. Columns are numbered from one, in file order.
pub mod keyword {
    /// Physical unit of a column.
    pub fn unit(column: usize) -> String {
        format!("TUNIT{}", column + 1)
    }

    /// Stored NULL sentinel of an integer column.
    pub fn null(column: usize) -> String {
        format!("TNULL{}", column + 1)
    }

    /// Bias added to stored values; the sign bit marks an unsigned column.
    pub fn zero(column: usize) -> String {
        format!("TZERO{}", column + 1)
    }

    /// Scale applied to stored values.
    pub fn scale(column: usize) -> String {
        format!("TSCAL{}", column + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_replaces_in_place() {
        let mut header = Header::default();
        header
            .set("TUNIT1", Attribute::Text("s".into()), None, None)
            .unwrap();
        header
            .set("TNULL1", Attribute::Integer(-1), Some("null"), None)
            .unwrap();
        header
            .set("TUNIT1", Attribute::Text("ms".into()), None, None)
            .unwrap();

        assert_eq!(header.cards().len(), 2);
        assert_eq!(header.cards()[0].name, "TUNIT1");
        assert_eq!(header.get("TUNIT1").unwrap(), Attribute::Text("ms".into()));
        assert_eq!(header.card("TNULL1").unwrap().comment.as_deref(), Some("null"));
    }

    #[test]
    fn missing_attribute_is_not_found() {
        let header = Header::default();
        assert!(header.get("TZERO9").unwrap_err().is_not_found());
    }

    #[test]
    fn integer_views() {
        assert_eq!(Attribute::Real(32768.0).as_i128(), Some(32768));
        assert_eq!(Attribute::Real(0.5).as_i128(), None);
        assert_eq!(
            Attribute::Unsigned(1 << 63).as_i128(),
            Some(9_223_372_036_854_775_808)
        );
        assert_eq!(Attribute::Unsigned(1 << 63).as_i64(), None);
        assert_eq!(Attribute::Text("1".into()).as_i64(), None);
    }

    #[test]
    fn keywords_are_one_based() {
        assert_eq!(keyword::unit(0), "TUNIT1");
        assert_eq!(keyword::zero(9), "TZERO10");
    }
}
