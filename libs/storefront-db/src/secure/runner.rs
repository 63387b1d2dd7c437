use sea_orm::{DatabaseConnection, DatabaseTransaction};

use crate::secure::{DbConn, DbTx};

mod private {
    use super::SeaOrmRunner;

    pub trait Sealed {
        fn as_seaorm(&self) -> SeaOrmRunner<'_>;
    }
}

/// Raw executor behind a runner. Never leaves this crate.
pub enum SeaOrmRunner<'a> {
    Conn(&'a DatabaseConnection),
    Tx(&'a DatabaseTransaction),
}

/// Something a scoped query can execute on: a [`DbConn`] or a [`DbTx`].
///
/// Sealed; there is no way to hand a raw `SeaORM` connection to the secure
/// builders from outside this crate.
pub trait DBRunner: private::Sealed + Sync {}

impl private::Sealed for DbConn<'_> {
    fn as_seaorm(&self) -> SeaOrmRunner<'_> {
        SeaOrmRunner::Conn(self.conn)
    }
}

impl DBRunner for DbConn<'_> {}

impl private::Sealed for DbTx<'_> {
    fn as_seaorm(&self) -> SeaOrmRunner<'_> {
        SeaOrmRunner::Tx(self.tx)
    }
}

impl DBRunner for DbTx<'_> {}

pub fn seaorm<R: DBRunner + ?Sized>(runner: &R) -> SeaOrmRunner<'_> {
    private::Sealed::as_seaorm(runner)
}
