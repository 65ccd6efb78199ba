//! Transaction proxy. Transactions have no optional extensions.

use crate::protocol::{DriverResult, Transaction};
use crate::proxy::Scope;

/// Instrumented [`Transaction`].
pub struct LoggedTx {
    inner: Box<dyn Transaction>,
    scope: Scope,
}

impl LoggedTx {
    pub fn new(inner: Box<dyn Transaction>, scope: Scope) -> Self {
        Self { inner, scope }
    }

    pub fn boxed(inner: Box<dyn Transaction>, scope: Scope) -> Box<dyn Transaction> {
        Box::new(Self::new(inner, scope))
    }
}

impl Transaction for LoggedTx {
    fn commit(&mut self) -> DriverResult<()> {
        let scope = &self.scope;
        let inner = &mut self.inner;
        scope.run(&scope.options.tx.commit, Vec::new(), || inner.commit())
    }

    fn rollback(&mut self) -> DriverResult<()> {
        let scope = &self.scope;
        let inner = &mut self.inner;
        scope.run(&scope.options.tx.rollback, Vec::new(), || inner.rollback())
    }
}
