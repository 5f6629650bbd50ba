//! contract invocation builder
//!
//! turns one of the four escrow actions into an abstract operation: target
//! contract, call name, ordered typed arguments. no i/o; arguments arrive
//! already validated

use parity_scale_codec::{Decode, Encode};

/// typed argument passed to a contract call
#[derive(Clone, Debug, PartialEq, Eq, Encode, Decode)]
pub enum Value {
    /// short symbol, used for escrow ids
    Sym(String),
    /// account or contract address
    Addr(String),
    /// signed 128-bit amount in the smallest unit
    I128(i128),
    Bool(bool),
}

/// one contract invocation
#[derive(Clone, Debug, PartialEq, Eq, Encode, Decode)]
pub struct Operation {
    pub contract: String,
    pub call: String,
    pub args: Vec<Value>,
}

impl Operation {
    /// create(id, sender, receiver, amount)
    pub fn create(contract: &str, id: &str, sender: &str, receiver: &str, amount: i128) -> Self {
        Self {
            contract: contract.into(),
            call: "create".into(),
            args: vec![
                Value::Sym(id.into()),
                Value::Addr(sender.into()),
                Value::Addr(receiver.into()),
                Value::I128(amount),
            ],
        }
    }

    /// get(id); read-only, needs no signer
    pub fn get(contract: &str, id: &str) -> Self {
        Self {
            contract: contract.into(),
            call: "get".into(),
            args: vec![Value::Sym(id.into())],
        }
    }

    /// release(id, caller)
    pub fn release(contract: &str, id: &str, caller: &str) -> Self {
        Self {
            contract: contract.into(),
            call: "release".into(),
            args: vec![Value::Sym(id.into()), Value::Addr(caller.into())],
        }
    }

    /// refund(id, caller)
    pub fn refund(contract: &str, id: &str, caller: &str) -> Self {
        Self {
            contract: contract.into(),
            call: "refund".into(),
            args: vec![Value::Sym(id.into()), Value::Addr(caller.into())],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_args_in_order() {
        let op = Operation::create("ctr", "escrow-001", "alice", "bob", 5_0000000);
        assert_eq!(op.contract, "ctr");
        assert_eq!(op.call, "create");
        assert_eq!(
            op.args,
            vec![
                Value::Sym("escrow-001".into()),
                Value::Addr("alice".into()),
                Value::Addr("bob".into()),
                Value::I128(5_0000000),
            ]
        );
    }

    #[test]
    fn test_get_takes_only_the_id() {
        let op = Operation::get("ctr", "escrow-001");
        assert_eq!(op.call, "get");
        assert_eq!(op.args, vec![Value::Sym("escrow-001".into())]);
    }

    #[test]
    fn test_release_args_in_order() {
        let op = Operation::release("ctr", "escrow-001", "alice");
        assert_eq!(op.call, "release");
        assert_eq!(
            op.args,
            vec![Value::Sym("escrow-001".into()), Value::Addr("alice".into())]
        );
    }

    #[test]
    fn test_refund_args_in_order() {
        let op = Operation::refund("ctr", "escrow-001", "alice");
        assert_eq!(op.call, "refund");
        assert_eq!(
            op.args,
            vec![Value::Sym("escrow-001".into()), Value::Addr("alice".into())]
        );
    }
}
