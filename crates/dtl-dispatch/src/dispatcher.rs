use dtl_ledger::{Ledger, TxClock};
use dtl_store::StateStore;
use tracing::debug;

use crate::error::{DispatchError, DispatchResult};
use crate::operation::{Channel, Operation};

/// Routes named calls to a [`Ledger`].
///
/// Mutations return `None`; queries return the encoded entity bytes.
pub struct Dispatcher<S, C> {
    ledger: Ledger<S, C>,
}

impl<S: StateStore, C: TxClock> Dispatcher<S, C> {
    pub fn new(ledger: Ledger<S, C>) -> Self {
        Self { ledger }
    }

    pub fn ledger(&self) -> &Ledger<S, C> {
        &self.ledger
    }

    /// Run any recognised operation.
    pub fn call<A: AsRef<str>>(&self, name: &str, args: &[A]) -> DispatchResult<Option<Vec<u8>>> {
        let op = Operation::from_name(name)
            .ok_or_else(|| DispatchError::UnknownOperation(name.to_string()))?;
        self.execute(op, args)
    }

    /// Host invoke entry point: only state-changing operations.
    pub fn invoke<A: AsRef<str>>(
        &self,
        name: &str,
        args: &[A],
    ) -> DispatchResult<Option<Vec<u8>>> {
        self.call_on(Channel::Invoke, name, args)
    }

    /// Host query entry point: only read operations.
    pub fn query<A: AsRef<str>>(&self, name: &str, args: &[A]) -> DispatchResult<Option<Vec<u8>>> {
        self.call_on(Channel::Query, name, args)
    }

    fn call_on<A: AsRef<str>>(
        &self,
        channel: Channel,
        name: &str,
        args: &[A],
    ) -> DispatchResult<Option<Vec<u8>>> {
        match Operation::from_name(name) {
            Some(op) if op.channel() == channel => self.execute(op, args),
            _ => {
                debug!(%channel, function = name, "no such function on channel");
                Err(DispatchError::UnknownOperation(name.to_string()))
            }
        }
    }

    /// Run `op` after checking the argument count.
    pub fn execute<A: AsRef<str>>(
        &self,
        op: Operation,
        args: &[A],
    ) -> DispatchResult<Option<Vec<u8>>> {
        if args.len() != op.arity() {
            return Err(DispatchError::InvalidArgumentCount {
                operation: op.name(),
                expected: op.arity(),
                actual: args.len(),
            });
        }
        let arg = |i: usize| args[i].as_ref();
        debug!(operation = %op, "dispatching");

        let payload = match op {
            Operation::RegisterDonator => {
                self.ledger.register_donator(arg(0))?;
                None
            }
            Operation::RegisterReceiver => {
                self.ledger.register_receiver(arg(0))?;
                None
            }
            Operation::RegisterProject => {
                self.ledger.register_project(arg(0))?;
                None
            }
            Operation::Donate => {
                self.ledger.donate(arg(0), arg(1), arg(2))?;
                None
            }
            Operation::Assign => {
                self.ledger.assign(arg(0), arg(1), arg(2))?;
                None
            }
            Operation::TrackProject => Some(self.ledger.track_project(arg(0))?),
            Operation::TrackReceiver => Some(self.ledger.track_receiver(arg(0))?),
            Operation::TrackDonator => Some(self.ledger.track_donator(arg(0))?),
        };
        Ok(payload)
    }
}
