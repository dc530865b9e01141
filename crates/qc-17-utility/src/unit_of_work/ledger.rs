//! Account and pool balances. Subtractions never go negative.

use shared_types::{Address, Amount, Pool};

use super::UnitOfWork;
use crate::error::{PersistenceResultExt, Result, UtilityError};

impl UnitOfWork {
    pub fn get_account_amount(&self, address: &Address) -> Result<Amount> {
        self.rw_context
            .get_account_amount(address)
            .during("get_account_amount")
    }

    pub fn set_account_amount(&mut self, address: &Address, amount: Amount) -> Result<()> {
        self.ensure_open()?;
        self.rw_context
            .set_account_amount(address, amount)
            .during("set_account_amount")
    }

    pub fn add_account_amount(&mut self, address: &Address, amount: &Amount) -> Result<()> {
        let balance = self.get_account_amount(address)? + amount;
        self.set_account_amount(address, balance)
    }

    /// # Errors
    /// - `InsufficientAmount`: balance lower than `amount`
    pub fn subtract_account_amount(&mut self, address: &Address, amount: &Amount) -> Result<()> {
        let balance = self.get_account_amount(address)?;
        if &balance < amount {
            return Err(UtilityError::InsufficientAmount { address: *address });
        }
        self.set_account_amount(address, balance - amount)
    }

    pub fn get_pool_amount(&self, pool: Pool) -> Result<Amount> {
        self.rw_context.get_pool_amount(pool).during("get_pool_amount")
    }

    pub fn set_pool_amount(&mut self, pool: Pool, amount: Amount) -> Result<()> {
        self.ensure_open()?;
        self.rw_context
            .set_pool_amount(pool, amount)
            .during("set_pool_amount")
    }

    pub fn add_pool_amount(&mut self, pool: Pool, amount: &Amount) -> Result<()> {
        let balance = self.get_pool_amount(pool)? + amount;
        self.set_pool_amount(pool, balance)
    }

    /// # Errors
    /// - `InsufficientPoolAmount`: balance lower than `amount`
    pub fn subtract_pool_amount(&mut self, pool: Pool, amount: &Amount) -> Result<()> {
        let balance = self.get_pool_amount(pool)?;
        if &balance < amount {
            return Err(UtilityError::InsufficientPoolAmount { pool });
        }
        self.set_pool_amount(pool, balance - amount)
    }
}
