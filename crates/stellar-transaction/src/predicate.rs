//! Claim predicates and claimants.
//!
//! A predicate is a small boolean expression over time, attached to each
//! claimant of a claimable balance. It is only ever evaluated by the ledger
//! when the balance is claimed; locally it is built, checked for depth, and
//! serialized. Trees are owned values: `Not`, `And` and `Or` box their
//! operands, so no sharing or cycles are possible.

use stellar_primitives::PublicKey;

use crate::codec::{unknown_discriminant, Decoder, Encoder, XdrCodec};
use crate::TransactionError;

const CLAIM_PREDICATE_UNCONDITIONAL: i32 = 0;
const CLAIM_PREDICATE_AND: i32 = 1;
const CLAIM_PREDICATE_OR: i32 = 2;
const CLAIM_PREDICATE_NOT: i32 = 3;
const CLAIM_PREDICATE_BEFORE_ABSOLUTE_TIME: i32 = 4;
const CLAIM_PREDICATE_BEFORE_RELATIVE_TIME: i32 = 5;

const CLAIMANT_TYPE_V0: i32 = 0;

/// A condition under which a claimant may claim a balance.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Predicate {
    /// Always claimable.
    Unconditional,
    /// Claimable until this many seconds after the balance was created.
    BeforeRelativeTime(i64),
    /// Claimable until this unix timestamp (exclusive).
    BeforeAbsoluteTime(i64),
    /// Claimable when the inner predicate is not satisfied.
    Not(Box<Predicate>),
    /// Claimable when both predicates are satisfied.
    And(Box<Predicate>, Box<Predicate>),
    /// Claimable when either predicate is satisfied.
    Or(Box<Predicate>, Box<Predicate>),
}

impl Predicate {
    /// A predicate that always holds.
    pub fn unconditional() -> Self {
        Predicate::Unconditional
    }

    /// Holds until `seconds` after the balance is created.
    pub fn before_relative_time(seconds: i64) -> Self {
        Predicate::BeforeRelativeTime(seconds)
    }

    /// Holds until the given unix timestamp.
    pub fn before_absolute_time(timestamp: i64) -> Self {
        Predicate::BeforeAbsoluteTime(timestamp)
    }

    /// Negation of `p`. Double negation is kept as written.
    pub fn not(p: Predicate) -> Self {
        Predicate::Not(Box::new(p))
    }

    /// Conjunction of `a` and `b`.
    pub fn and(a: Predicate, b: Predicate) -> Self {
        Predicate::And(Box::new(a), Box::new(b))
    }

    /// Disjunction of `a` and `b`.
    pub fn or(a: Predicate, b: Predicate) -> Self {
        Predicate::Or(Box::new(a), Box::new(b))
    }

    /// Nesting depth of the tree; a leaf has depth 1.
    pub fn depth(&self) -> usize {
        match self {
            Predicate::Unconditional
            | Predicate::BeforeRelativeTime(_)
            | Predicate::BeforeAbsoluteTime(_) => 1,
            Predicate::Not(p) => 1 + p.depth(),
            Predicate::And(a, b) | Predicate::Or(a, b) => 1 + a.depth().max(b.depth()),
        }
    }

    /// Check the tree against a maximum depth.
    pub fn validate(&self, max_depth: usize) -> Result<(), TransactionError> {
        let depth = self.depth();
        if depth > max_depth {
            return Err(TransactionError::PredicateTooDeep {
                depth,
                max: max_depth,
            });
        }
        Ok(())
    }

    fn write_node(&self, enc: &mut Encoder) {
        match self {
            Predicate::Unconditional => enc.write_i32(CLAIM_PREDICATE_UNCONDITIONAL),
            Predicate::And(a, b) => {
                enc.write_i32(CLAIM_PREDICATE_AND);
                enc.write_u32(2);
                a.write_node(enc);
                b.write_node(enc);
            }
            Predicate::Or(a, b) => {
                enc.write_i32(CLAIM_PREDICATE_OR);
                enc.write_u32(2);
                a.write_node(enc);
                b.write_node(enc);
            }
            Predicate::Not(p) => {
                enc.write_i32(CLAIM_PREDICATE_NOT);
                enc.write_bool(true);
                p.write_node(enc);
            }
            Predicate::BeforeAbsoluteTime(t) => {
                enc.write_i32(CLAIM_PREDICATE_BEFORE_ABSOLUTE_TIME);
                enc.write_i64(*t);
            }
            Predicate::BeforeRelativeTime(t) => {
                enc.write_i32(CLAIM_PREDICATE_BEFORE_RELATIVE_TIME);
                enc.write_i64(*t);
            }
        }
    }

    fn read_node(dec: &mut Decoder<'_>, level: usize) -> Result<Self, TransactionError> {
        let max = dec.limits().max_predicate_depth;
        if level > max {
            return Err(TransactionError::MalformedInput(format!(
                "claim predicate nested deeper than {}",
                max
            )));
        }
        match dec.read_i32()? {
            CLAIM_PREDICATE_UNCONDITIONAL => Ok(Predicate::Unconditional),
            CLAIM_PREDICATE_AND => {
                let (a, b) = Self::read_pair(dec, level)?;
                Ok(Predicate::And(a, b))
            }
            CLAIM_PREDICATE_OR => {
                let (a, b) = Self::read_pair(dec, level)?;
                Ok(Predicate::Or(a, b))
            }
            CLAIM_PREDICATE_NOT => {
                if !dec.read_bool()? {
                    return Err(TransactionError::MalformedInput(
                        "not predicate without operand".to_string(),
                    ));
                }
                Ok(Predicate::Not(Box::new(Self::read_node(dec, level + 1)?)))
            }
            CLAIM_PREDICATE_BEFORE_ABSOLUTE_TIME => Ok(Predicate::BeforeAbsoluteTime(dec.read_i64()?)),
            CLAIM_PREDICATE_BEFORE_RELATIVE_TIME => Ok(Predicate::BeforeRelativeTime(dec.read_i64()?)),
            v => Err(unknown_discriminant("claim predicate type", v)),
        }
    }

    fn read_pair(
        dec: &mut Decoder<'_>,
        level: usize,
    ) -> Result<(Box<Predicate>, Box<Predicate>), TransactionError> {
        let len = dec.read_u32()?;
        if len != 2 {
            return Err(TransactionError::MalformedInput(format!(
                "and/or predicate needs exactly 2 operands, got {}",
                len
            )));
        }
        let a = Self::read_node(dec, level + 1)?;
        let b = Self::read_node(dec, level + 1)?;
        Ok((Box::new(a), Box::new(b)))
    }
}

impl XdrCodec for Predicate {
    /// Fails with `PredicateTooDeep` when the tree exceeds the encoder's
    /// `max_predicate_depth`.
    fn encode(&self, enc: &mut Encoder) -> Result<(), TransactionError> {
        self.validate(enc.limits().max_predicate_depth)?;
        self.write_node(enc);
        Ok(())
    }

    fn decode(dec: &mut Decoder<'_>) -> Result<Self, TransactionError> {
        Self::read_node(dec, 1)
    }
}

/// An account allowed to claim a balance, and the condition it must meet.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Claimant {
    /// Account that may claim.
    pub destination: PublicKey,
    /// Condition for claiming.
    pub predicate: Predicate,
}

impl Claimant {
    /// Create a claimant.
    pub fn new(destination: PublicKey, predicate: Predicate) -> Self {
        Claimant {
            destination,
            predicate,
        }
    }
}

impl XdrCodec for Claimant {
    fn encode(&self, enc: &mut Encoder) -> Result<(), TransactionError> {
        enc.write_i32(CLAIMANT_TYPE_V0);
        self.destination.encode(enc)?;
        self.predicate.encode(enc)
    }

    fn decode(dec: &mut Decoder<'_>) -> Result<Self, TransactionError> {
        match dec.read_i32()? {
            CLAIMANT_TYPE_V0 => {
                let destination = PublicKey::decode(dec)?;
                let predicate = Predicate::decode(dec)?;
                Ok(Claimant {
                    destination,
                    predicate,
                })
            }
            v => Err(unknown_discriminant("claimant type", v)),
        }
    }
}
