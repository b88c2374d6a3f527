//! Txrep: a line-oriented `key: value` text form of transaction envelopes.
//!
//! Every envelope field gets one line, keyed by its dotted path
//! (`tx.operations[0].body.paymentOp.amount`). Optional fields carry a
//! `._present` line, arrays a `.len` line. Strings are double-quoted with
//! JSON escapes; anything after the value in parentheses is a comment and
//! is ignored when parsing.

use std::collections::HashMap;
use std::str::FromStr;

use stellar_primitives::PublicKey;

use crate::account::MuxedAccount;
use crate::amount::{format_amount, Price};
use crate::asset::Asset;
use crate::codec::{DEFAULT_MAX_CLAIMANTS, DEFAULT_MAX_PREDICATE_DEPTH};
use crate::memo::Memo;
use crate::operation::{
    BumpSequenceOp, ChangeTrustOp, ClaimClaimableBalanceOp, ClaimableBalanceId, CreateAccountOp,
    CreateClaimableBalanceOp, ManageBuyOfferOp, ManageDataOp, ManageSellOfferOp, Operation,
    OperationBody, OperationType, PaymentOp, SetOptionsOp, SetTrustLineFlagsOp, Signer, SignerKey,
};
use crate::predicate::{Claimant, Predicate};
use crate::transaction::{DecoratedSignature, TimeBounds, Transaction, MAX_OPERATIONS, MAX_SIGNATURES};
use crate::TransactionError;

impl Transaction {
    /// Render the envelope as txrep text.
    pub fn to_txrep(&self) -> String {
        let mut w = TxrepWriter::default();
        w.field("type", "ENVELOPE_TYPE_TX");
        w.commented("tx.sourceAccount", self.source_account(), "transaction source account");
        w.commented("tx.fee", self.fee(), "total fee in stroops");
        w.commented("tx.seqNum", self.sequence_number(), "sequence number");
        match self.time_bounds() {
            Some(tb) => {
                w.field("tx.cond.type", "PRECOND_TIME");
                w.commented("tx.cond.timeBounds.minTime", tb.min_time, "earliest unix time");
                let max_note = if tb.max_time == 0 { "no upper bound" } else { "latest unix time" };
                w.commented("tx.cond.timeBounds.maxTime", tb.max_time, max_note);
            }
            None => w.field("tx.cond.type", "PRECOND_NONE"),
        }
        write_memo(&mut w, self.memo());
        w.field("tx.operations.len", self.operations().len());
        for (i, op) in self.operations().iter().enumerate() {
            write_operation(&mut w, &format!("tx.operations[{}]", i), op);
        }
        w.field("tx.ext.v", 0);
        w.field("signatures.len", self.signatures().len());
        for (i, sig) in self.signatures().iter().enumerate() {
            w.commented(
                &format!("signatures[{}].hint", i),
                hex::encode(sig.hint),
                &self.hint_signer(sig.hint),
            );
            w.field(&format!("signatures[{}].signature", i), hex::encode(&sig.signature));
        }
        w.out
    }

    /// Name the source account a signature hint belongs to, if any.
    fn hint_signer(&self, hint: [u8; 4]) -> String {
        std::iter::once(self.source_account())
            .chain(self.operations().iter().filter_map(|op| op.source_account.as_ref()))
            .map(MuxedAccount::account_id)
            .find(|key| key.signature_hint() == hint)
            .map(|key| format!("signer {}", key.account_id()))
            .unwrap_or_else(|| "signer not among the source accounts".to_string())
    }

    /// Parse txrep text produced by [`to_txrep`](Self::to_txrep) or by hand.
    ///
    /// # Returns
    /// `MalformedInput` for missing keys, unparseable values, unknown
    /// type names or limits exceeded.
    pub fn from_txrep(text: &str) -> Result<Self, TransactionError> {
        parse_transaction(&TxrepFields::parse(text)?).map_err(|e| match e {
            TransactionError::MalformedInput(_) => e,
            other => TransactionError::MalformedInput(other.to_string()),
        })
    }
}

// ---------------------------------------------------------------------------
// Writing
// ---------------------------------------------------------------------------

#[derive(Default)]
struct TxrepWriter {
    out: String,
}

impl TxrepWriter {
    fn field(&mut self, key: &str, value: impl std::fmt::Display) {
        self.out.push_str(&format!("{}: {}\n", key, value));
    }

    fn commented(&mut self, key: &str, value: impl std::fmt::Display, comment: &str) {
        self.out.push_str(&format!("{}: {} ({})\n", key, value, comment));
    }

    fn amount(&mut self, key: &str, stroops: i64) {
        self.commented(key, stroops, &format_amount(stroops));
    }

    fn text(&mut self, key: &str, value: &str) {
        self.field(key, quote(value));
    }

    fn present(&mut self, key: &str, present: bool) {
        self.field(&format!("{}._present", key), present);
    }

    fn optional<T: std::fmt::Display>(&mut self, key: &str, value: Option<T>) {
        self.present(key, value.is_some());
        if let Some(v) = value {
            self.field(key, v);
        }
    }
}

fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 || c as u32 == 0x7f => {
                out.push_str(&format!("\\u{:04x}", c as u32));
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

fn write_memo(w: &mut TxrepWriter, memo: &Memo) {
    match memo {
        Memo::None => w.field("tx.memo.type", "MEMO_NONE"),
        Memo::Text(text) => {
            w.field("tx.memo.type", "MEMO_TEXT");
            w.commented("tx.memo.text", quote(text), "memo text");
        }
        Memo::Id(id) => {
            w.field("tx.memo.type", "MEMO_ID");
            w.commented("tx.memo.id", id, "memo id");
        }
        Memo::Hash(h) => {
            w.field("tx.memo.type", "MEMO_HASH");
            w.commented("tx.memo.hash", hex::encode(h), "memo hash");
        }
        Memo::Return(h) => {
            w.field("tx.memo.type", "MEMO_RETURN");
            w.commented("tx.memo.retHash", hex::encode(h), "hash of the refunded transaction");
        }
    }
}

fn body_key(op_type: OperationType) -> &'static str {
    match op_type {
        OperationType::CreateAccount => "createAccountOp",
        OperationType::Payment => "paymentOp",
        OperationType::ManageSellOffer => "manageSellOfferOp",
        OperationType::SetOptions => "setOptionsOp",
        OperationType::ChangeTrust => "changeTrustOp",
        OperationType::AccountMerge => "destination",
        OperationType::ManageData => "manageDataOp",
        OperationType::BumpSequence => "bumpSequenceOp",
        OperationType::ManageBuyOffer => "manageBuyOfferOp",
        OperationType::CreateClaimableBalance => "createClaimableBalanceOp",
        OperationType::ClaimClaimableBalance => "claimClaimableBalanceOp",
        OperationType::SetTrustLineFlags => "setTrustLineFlagsOp",
    }
}

fn write_operation(w: &mut TxrepWriter, prefix: &str, op: &Operation) {
    let source_key = format!("{}.sourceAccount", prefix);
    w.present(&source_key, op.source_account.is_some());
    if let Some(source) = &op.source_account {
        w.commented(&source_key, source, "operation source account");
    }
    let op_type = op.operation_type();
    w.field(&format!("{}.body.type", prefix), op_type);
    let p = format!("{}.body.{}", prefix, body_key(op_type));
    match &op.body {
        OperationBody::CreateAccount(op) => {
            w.field(&format!("{}.destination", p), op.destination);
            w.amount(&format!("{}.startingBalance", p), op.starting_balance);
        }
        OperationBody::Payment(op) => {
            w.field(&format!("{}.destination", p), op.destination);
            w.field(&format!("{}.asset", p), &op.asset);
            w.amount(&format!("{}.amount", p), op.amount);
        }
        OperationBody::ManageSellOffer(op) => {
            w.field(&format!("{}.selling", p), &op.selling);
            w.field(&format!("{}.buying", p), &op.buying);
            w.amount(&format!("{}.amount", p), op.amount);
            write_price(w, &p, &op.price);
            w.field(&format!("{}.offerID", p), op.offer_id);
        }
        OperationBody::ManageBuyOffer(op) => {
            w.field(&format!("{}.selling", p), &op.selling);
            w.field(&format!("{}.buying", p), &op.buying);
            w.amount(&format!("{}.buyAmount", p), op.buy_amount);
            write_price(w, &p, &op.price);
            w.field(&format!("{}.offerID", p), op.offer_id);
        }
        OperationBody::SetOptions(op) => {
            w.optional(&format!("{}.inflationDest", p), op.inflation_dest);
            w.optional(&format!("{}.clearFlags", p), op.clear_flags);
            w.optional(&format!("{}.setFlags", p), op.set_flags);
            w.optional(&format!("{}.masterWeight", p), op.master_weight);
            w.optional(&format!("{}.lowThreshold", p), op.low_threshold);
            w.optional(&format!("{}.medThreshold", p), op.med_threshold);
            w.optional(&format!("{}.highThreshold", p), op.high_threshold);
            w.optional(&format!("{}.homeDomain", p), op.home_domain.as_deref().map(quote));
            let signer_key = format!("{}.signer", p);
            w.present(&signer_key, op.signer.is_some());
            if let Some(signer) = &op.signer {
                w.field(&format!("{}.key", signer_key), signer.key);
                w.field(&format!("{}.weight", signer_key), signer.weight);
            }
        }
        OperationBody::ChangeTrust(op) => {
            w.field(&format!("{}.line", p), &op.line);
            w.amount(&format!("{}.limit", p), op.limit);
        }
        OperationBody::AccountMerge(destination) => w.field(&p, destination),
        OperationBody::ManageData(op) => {
            w.text(&format!("{}.dataName", p), &op.data_name);
            w.optional(&format!("{}.dataValue", p), op.data_value.as_ref().map(hex::encode));
        }
        OperationBody::BumpSequence(op) => w.field(&format!("{}.bumpTo", p), op.bump_to),
        OperationBody::CreateClaimableBalance(op) => {
            w.field(&format!("{}.asset", p), &op.asset);
            w.amount(&format!("{}.amount", p), op.amount);
            w.field(&format!("{}.claimants.len", p), op.claimants.len());
            for (i, claimant) in op.claimants.iter().enumerate() {
                let c = format!("{}.claimants[{}]", p, i);
                w.field(&format!("{}.type", c), "CLAIMANT_TYPE_V0");
                w.field(&format!("{}.v0.destination", c), claimant.destination);
                write_predicate(w, &format!("{}.v0.predicate", c), &claimant.predicate);
            }
        }
        OperationBody::ClaimClaimableBalance(op) => {
            w.field(&format!("{}.balanceID.type", p), "CLAIMABLE_BALANCE_ID_TYPE_V0");
            w.field(&format!("{}.balanceID.v0", p), hex::encode(op.balance_id.hash()));
        }
        OperationBody::SetTrustLineFlags(op) => {
            w.field(&format!("{}.trustor", p), op.trustor);
            w.field(&format!("{}.asset", p), &op.asset);
            w.field(&format!("{}.clearFlags", p), op.clear_flags);
            w.field(&format!("{}.setFlags", p), op.set_flags);
        }
    }
}

fn write_price(w: &mut TxrepWriter, prefix: &str, price: &Price) {
    w.field(&format!("{}.price.n", prefix), price.n);
    w.field(&format!("{}.price.d", prefix), price.d);
}

fn write_predicate(w: &mut TxrepWriter, prefix: &str, predicate: &Predicate) {
    let type_key = format!("{}.type", prefix);
    match predicate {
        Predicate::Unconditional => w.field(&type_key, "CLAIM_PREDICATE_UNCONDITIONAL"),
        Predicate::And(a, b) => {
            w.field(&type_key, "CLAIM_PREDICATE_AND");
            w.field(&format!("{}.andPredicates.len", prefix), 2);
            write_predicate(w, &format!("{}.andPredicates[0]", prefix), a);
            write_predicate(w, &format!("{}.andPredicates[1]", prefix), b);
        }
        Predicate::Or(a, b) => {
            w.field(&type_key, "CLAIM_PREDICATE_OR");
            w.field(&format!("{}.orPredicates.len", prefix), 2);
            write_predicate(w, &format!("{}.orPredicates[0]", prefix), a);
            write_predicate(w, &format!("{}.orPredicates[1]", prefix), b);
        }
        Predicate::Not(p) => {
            w.field(&type_key, "CLAIM_PREDICATE_NOT");
            let not_key = format!("{}.notPredicate", prefix);
            w.present(&not_key, true);
            write_predicate(w, &not_key, p);
        }
        Predicate::BeforeAbsoluteTime(t) => {
            w.field(&type_key, "CLAIM_PREDICATE_BEFORE_ABSOLUTE_TIME");
            w.commented(&format!("{}.absBefore", prefix), t, "claimable before this unix time");
        }
        Predicate::BeforeRelativeTime(t) => {
            w.field(&type_key, "CLAIM_PREDICATE_BEFORE_RELATIVE_TIME");
            w.commented(
                &format!("{}.relBefore", prefix),
                t,
                "seconds after the balance is created",
            );
        }
    }
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

fn malformed(msg: impl Into<String>) -> TransactionError {
    TransactionError::MalformedInput(msg.into())
}

/// Parsed `key: value` lines with comments stripped.
struct TxrepFields {
    values: HashMap<String, String>,
}

impl TxrepFields {
    fn parse(text: &str) -> Result<Self, TransactionError> {
        let mut values = HashMap::new();
        for (n, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let (key, rest) = line
                .split_once(':')
                .ok_or_else(|| malformed(format!("line {}: expected `key: value`", n + 1)))?;
            let value = parse_value(rest.trim())
                .map_err(|e| malformed(format!("line {}: {}", n + 1, e)))?;
            if values.insert(key.trim().to_string(), value).is_some() {
                return Err(malformed(format!("line {}: duplicate key {}", n + 1, key.trim())));
            }
        }
        Ok(TxrepFields { values })
    }

    fn str(&self, key: &str) -> Result<&str, TransactionError> {
        self.values
            .get(key)
            .map(String::as_str)
            .ok_or_else(|| malformed(format!("missing {}", key)))
    }

    fn num<T: FromStr>(&self, key: &str) -> Result<T, TransactionError> {
        let raw = self.str(key)?;
        raw.parse()
            .map_err(|_| malformed(format!("{}: invalid number {:?}", key, raw)))
    }

    fn bool(&self, key: &str) -> Result<bool, TransactionError> {
        match self.str(key)? {
            "true" => Ok(true),
            "false" => Ok(false),
            other => Err(malformed(format!("{}: invalid boolean {:?}", key, other))),
        }
    }

    fn len(&self, key: &str, max: usize) -> Result<usize, TransactionError> {
        let len: usize = self.num(&format!("{}.len", key))?;
        if len > max {
            return Err(malformed(format!("{}.len {} exceeds maximum {}", key, len, max)));
        }
        Ok(len)
    }

    fn present(&self, key: &str) -> Result<bool, TransactionError> {
        self.bool(&format!("{}._present", key))
    }

    fn optional<T>(
        &self,
        key: &str,
        read: impl FnOnce(&Self, &str) -> Result<T, TransactionError>,
    ) -> Result<Option<T>, TransactionError> {
        if self.present(key)? {
            Ok(Some(read(self, key)?))
        } else {
            Ok(None)
        }
    }

    fn parsed<T>(&self, key: &str) -> Result<T, TransactionError>
    where
        T: FromStr<Err = TransactionError>,
    {
        T::from_str(self.str(key)?).map_err(|e| malformed(format!("{}: {}", key, e)))
    }

    fn account(&self, key: &str) -> Result<PublicKey, TransactionError> {
        PublicKey::from_account_id(self.str(key)?).map_err(|e| malformed(format!("{}: {}", key, e)))
    }

    fn hex(&self, key: &str) -> Result<Vec<u8>, TransactionError> {
        hex::decode(self.str(key)?).map_err(|e| malformed(format!("{}: {}", key, e)))
    }

    fn hash(&self, key: &str) -> Result<[u8; 32], TransactionError> {
        let bytes = self.hex(key)?;
        <[u8; 32]>::try_from(bytes.as_slice())
            .map_err(|_| malformed(format!("{}: expected 32 bytes, got {}", key, bytes.len())))
    }

    fn price(&self, prefix: &str) -> Result<Price, TransactionError> {
        Ok(Price {
            n: self.num(&format!("{}.price.n", prefix))?,
            d: self.num(&format!("{}.price.d", prefix))?,
        })
    }
}

/// The value part of a line: a quoted string, or the first token.
fn parse_value(raw: &str) -> Result<String, String> {
    if let Some(rest) = raw.strip_prefix('"') {
        return unquote(rest);
    }
    Ok(raw.split_whitespace().next().unwrap_or("").to_string())
}

/// Decode a JSON-style string body up to its closing quote.
fn unquote(s: &str) -> Result<String, String> {
    let mut out = String::new();
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        match c {
            '"' => return Ok(out),
            '\\' => match chars.next() {
                Some('"') => out.push('"'),
                Some('\\') => out.push('\\'),
                Some('/') => out.push('/'),
                Some('n') => out.push('\n'),
                Some('r') => out.push('\r'),
                Some('t') => out.push('\t'),
                Some('b') => out.push('\u{8}'),
                Some('f') => out.push('\u{c}'),
                Some('u') => {
                    let code: String = chars.by_ref().take(4).collect();
                    let c = u32::from_str_radix(&code, 16)
                        .ok()
                        .filter(|_| code.len() == 4)
                        .and_then(char::from_u32)
                        .ok_or_else(|| format!("invalid escape \\u{}", code))?;
                    out.push(c);
                }
                other => return Err(format!("invalid escape {:?}", other)),
            },
            c => out.push(c),
        }
    }
    Err("unterminated string".to_string())
}

fn parse_transaction(f: &TxrepFields) -> Result<Transaction, TransactionError> {
    match f.str("type")? {
        "ENVELOPE_TYPE_TX" => {}
        other => return Err(malformed(format!("unsupported envelope type {}", other))),
    }
    let source_account: MuxedAccount = f.parsed("tx.sourceAccount")?;
    let fee: u32 = f.num("tx.fee")?;
    let sequence_number: i64 = f.num("tx.seqNum")?;
    let time_bounds = match f.str("tx.cond.type")? {
        "PRECOND_NONE" => None,
        "PRECOND_TIME" => Some(TimeBounds {
            min_time: f.num("tx.cond.timeBounds.minTime")?,
            max_time: f.num("tx.cond.timeBounds.maxTime")?,
        }),
        other => return Err(malformed(format!("unsupported precondition {}", other))),
    };
    let memo = parse_memo(f)?;

    let op_count = f.len("tx.operations", MAX_OPERATIONS)?;
    if op_count == 0 {
        return Err(malformed("transaction without operations"));
    }
    let operations = (0..op_count)
        .map(|i| parse_operation(f, &format!("tx.operations[{}]", i)))
        .collect::<Result<Vec<_>, _>>()?;
    match f.num::<i32>("tx.ext.v")? {
        0 => {}
        v => return Err(malformed(format!("unsupported tx.ext.v {}", v))),
    }

    let mut tx = Transaction::from_parts(
        source_account,
        fee,
        sequence_number,
        time_bounds,
        memo,
        operations,
    );
    let sig_count = f.len("signatures", MAX_SIGNATURES)?;
    for i in 0..sig_count {
        let hint = f.hex(&format!("signatures[{}].hint", i))?;
        let hint = <[u8; 4]>::try_from(hint.as_slice())
            .map_err(|_| malformed(format!("signatures[{}].hint must be 4 bytes", i)))?;
        let signature = f.hex(&format!("signatures[{}].signature", i))?;
        tx.add_signature(DecoratedSignature { hint, signature })?;
    }
    Ok(tx)
}

fn parse_memo(f: &TxrepFields) -> Result<Memo, TransactionError> {
    match f.str("tx.memo.type")? {
        "MEMO_NONE" => Ok(Memo::None),
        "MEMO_TEXT" => Memo::text(f.str("tx.memo.text")?),
        "MEMO_ID" => Ok(Memo::Id(f.num("tx.memo.id")?)),
        "MEMO_HASH" => Ok(Memo::Hash(f.hash("tx.memo.hash")?)),
        "MEMO_RETURN" => Ok(Memo::Return(f.hash("tx.memo.retHash")?)),
        other => Err(malformed(format!("unknown memo type {}", other))),
    }
}

fn parse_operation(f: &TxrepFields, prefix: &str) -> Result<Operation, TransactionError> {
    let source_account = f.optional(&format!("{}.sourceAccount", prefix), |f, k| f.parsed::<MuxedAccount>(k))?;
    let type_name = f.str(&format!("{}.body.type", prefix))?;
    let op_type = OperationType::from_name(type_name)
        .ok_or_else(|| malformed(format!("unsupported operation type {}", type_name)))?;
    let p = format!("{}.body.{}", prefix, body_key(op_type));
    let k = |field: &str| format!("{}.{}", p, field);

    let body = match op_type {
        OperationType::CreateAccount => OperationBody::CreateAccount(CreateAccountOp {
            destination: f.account(&k("destination"))?,
            starting_balance: f.num(&k("startingBalance"))?,
        }),
        OperationType::Payment => OperationBody::Payment(PaymentOp {
            destination: f.parsed(&k("destination"))?,
            asset: f.parsed::<Asset>(&k("asset"))?,
            amount: f.num(&k("amount"))?,
        }),
        OperationType::ManageSellOffer => OperationBody::ManageSellOffer(ManageSellOfferOp {
            selling: f.parsed(&k("selling"))?,
            buying: f.parsed(&k("buying"))?,
            amount: f.num(&k("amount"))?,
            price: f.price(&p)?,
            offer_id: f.num(&k("offerID"))?,
        }),
        OperationType::ManageBuyOffer => OperationBody::ManageBuyOffer(ManageBuyOfferOp {
            selling: f.parsed(&k("selling"))?,
            buying: f.parsed(&k("buying"))?,
            buy_amount: f.num(&k("buyAmount"))?,
            price: f.price(&p)?,
            offer_id: f.num(&k("offerID"))?,
        }),
        OperationType::SetOptions => OperationBody::SetOptions(SetOptionsOp {
            inflation_dest: f.optional(&k("inflationDest"), TxrepFields::account)?,
            clear_flags: f.optional(&k("clearFlags"), |f, key| f.num(key))?,
            set_flags: f.optional(&k("setFlags"), |f, key| f.num(key))?,
            master_weight: f.optional(&k("masterWeight"), |f, key| f.num(key))?,
            low_threshold: f.optional(&k("lowThreshold"), |f, key| f.num(key))?,
            med_threshold: f.optional(&k("medThreshold"), |f, key| f.num(key))?,
            high_threshold: f.optional(&k("highThreshold"), |f, key| f.num(key))?,
            home_domain: f.optional(&k("homeDomain"), |f, key| f.str(key).map(str::to_string))?,
            signer: f.optional(&k("signer"), |f, key| {
                Ok(Signer {
                    key: f.parsed::<SignerKey>(&format!("{}.key", key))?,
                    weight: f.num(&format!("{}.weight", key))?,
                })
            })?,
        }),
        OperationType::ChangeTrust => OperationBody::ChangeTrust(ChangeTrustOp {
            line: f.parsed(&k("line"))?,
            limit: f.num(&k("limit"))?,
        }),
        OperationType::AccountMerge => OperationBody::AccountMerge(f.parsed(&p)?),
        OperationType::ManageData => OperationBody::ManageData(ManageDataOp {
            data_name: f.str(&k("dataName"))?.to_string(),
            data_value: f.optional(&k("dataValue"), TxrepFields::hex)?,
        }),
        OperationType::BumpSequence => OperationBody::BumpSequence(BumpSequenceOp {
            bump_to: f.num(&k("bumpTo"))?,
        }),
        OperationType::CreateClaimableBalance => {
            let count = f.len(&k("claimants"), DEFAULT_MAX_CLAIMANTS)?;
            let claimants = (0..count)
                .map(|i| parse_claimant(f, &format!("{}.claimants[{}]", p, i)))
                .collect::<Result<Vec<_>, _>>()?;
            OperationBody::CreateClaimableBalance(CreateClaimableBalanceOp {
                asset: f.parsed(&k("asset"))?,
                amount: f.num(&k("amount"))?,
                claimants,
            })
        }
        OperationType::ClaimClaimableBalance => {
            match f.str(&k("balanceID.type"))? {
                "CLAIMABLE_BALANCE_ID_TYPE_V0" => {}
                other => return Err(malformed(format!("unknown balance id type {}", other))),
            }
            OperationBody::ClaimClaimableBalance(ClaimClaimableBalanceOp {
                balance_id: ClaimableBalanceId::V0(f.hash(&k("balanceID.v0"))?),
            })
        }
        OperationType::SetTrustLineFlags => OperationBody::SetTrustLineFlags(SetTrustLineFlagsOp {
            trustor: f.account(&k("trustor"))?,
            asset: f.parsed(&k("asset"))?,
            clear_flags: f.num(&k("clearFlags"))?,
            set_flags: f.num(&k("setFlags"))?,
        }),
    };
    Ok(Operation { source_account, body })
}

fn parse_claimant(f: &TxrepFields, prefix: &str) -> Result<Claimant, TransactionError> {
    match f.str(&format!("{}.type", prefix))? {
        "CLAIMANT_TYPE_V0" => {}
        other => return Err(malformed(format!("unknown claimant type {}", other))),
    }
    Ok(Claimant {
        destination: f.account(&format!("{}.v0.destination", prefix))?,
        predicate: parse_predicate(f, &format!("{}.v0.predicate", prefix), 1)?,
    })
}

fn parse_predicate(f: &TxrepFields, prefix: &str, level: usize) -> Result<Predicate, TransactionError> {
    if level > DEFAULT_MAX_PREDICATE_DEPTH {
        return Err(malformed(format!(
            "{}: claim predicate nested deeper than {}",
            prefix, DEFAULT_MAX_PREDICATE_DEPTH
        )));
    }
    let pair = |name: &str| -> Result<(Predicate, Predicate), TransactionError> {
        let key = format!("{}.{}", prefix, name);
        match f.num::<usize>(&format!("{}.len", key))? {
            2 => Ok((
                parse_predicate(f, &format!("{}[0]", key), level + 1)?,
                parse_predicate(f, &format!("{}[1]", key), level + 1)?,
            )),
            n => Err(malformed(format!("{}.len must be 2, got {}", key, n))),
        }
    };
    match f.str(&format!("{}.type", prefix))? {
        "CLAIM_PREDICATE_UNCONDITIONAL" => Ok(Predicate::Unconditional),
        "CLAIM_PREDICATE_AND" => {
            let (a, b) = pair("andPredicates")?;
            Ok(Predicate::and(a, b))
        }
        "CLAIM_PREDICATE_OR" => {
            let (a, b) = pair("orPredicates")?;
            Ok(Predicate::or(a, b))
        }
        "CLAIM_PREDICATE_NOT" => {
            let key = format!("{}.notPredicate", prefix);
            if !f.present(&key)? {
                return Err(malformed(format!("{} is absent", key)));
            }
            Ok(Predicate::not(parse_predicate(f, &key, level + 1)?))
        }
        "CLAIM_PREDICATE_BEFORE_ABSOLUTE_TIME" => {
            Ok(Predicate::BeforeAbsoluteTime(f.num(&format!("{}.absBefore", prefix))?))
        }
        "CLAIM_PREDICATE_BEFORE_RELATIVE_TIME" => {
            Ok(Predicate::BeforeRelativeTime(f.num(&format!("{}.relBefore", prefix))?))
        }
        other => Err(malformed(format!("unknown claim predicate type {}", other))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_unquote() {
        let s = "say \"hi\"\n\\ ok\u{1}é";
        let q = quote(s);
        assert_eq!(q, "\"say \\\"hi\\\"\\n\\\\ ok\\u0001é\"");
        assert_eq!(unquote(&q[1..]).unwrap(), s);
    }

    #[test]
    fn test_parse_value_strips_comment() {
        assert_eq!(parse_value("100000000 (10.0000000)").unwrap(), "100000000");
        assert_eq!(parse_value("\"a b\" (text)").unwrap(), "a b");
        assert!(parse_value("\"open").is_err());
    }

    #[test]
    fn test_duplicate_key_rejected() {
        assert!(matches!(
            TxrepFields::parse("tx.fee: 100\ntx.fee: 200\n"),
            Err(TransactionError::MalformedInput(_))
        ));
    }
}
