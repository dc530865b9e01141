//! Ante-handling and single-transaction application.

use qc_04_state_management::TxResult;
use shared_types::{transaction_hash, Address, Pool, Transaction};
use tracing::debug;

use super::UnitOfWork;
use crate::domain::Message;
use crate::error::{PersistenceResultExt, Result, UtilityError};

impl UnitOfWork {
    /// Charge the fee and authorize the signer.
    ///
    /// Order: fee lookup, balance check, signer check, fee debit, signer stamp.
    pub fn ante_handle(&mut self, message: &mut Message, signer: Address) -> Result<()> {
        let fee = self.get_fee(message)?;
        if self.get_account_amount(&signer)? < fee {
            return Err(UtilityError::InsufficientAmount { address: signer });
        }
        if !self.signer_candidates(message)?.allows(&signer) {
            return Err(UtilityError::InvalidSigner { signer });
        }
        self.subtract_account_amount(&signer, &fee)?;
        self.add_pool_amount(Pool::FeeCollector, &fee)?;
        message.set_signer(signer);
        Ok(())
    }

    /// Validate, ante-handle and dispatch one transaction, indexing it at
    /// position `index` of the block.
    pub fn apply_transaction(&mut self, index: u32, tx_bytes: &[u8]) -> Result<TxResult> {
        self.ensure_open()?;
        let tx_hash = transaction_hash(tx_bytes);
        let tx = Transaction::from_bytes(tx_bytes)?;
        tx.validate_basic()?;
        if self
            .rw_context
            .transaction_exists(&tx_hash)
            .during("transaction_exists")?
        {
            return Err(UtilityError::TransactionAlreadyCommitted(tx_hash));
        }

        let mut message = Message::from_any(&tx.msg)?;
        message.validate_basic()?;
        let signer = tx.signer_address()?;
        self.ante_handle(&mut message, signer)?;
        self.handle_message(&message)?;

        let result = TxResult {
            tx_hash,
            height: self.height,
            index,
            signer,
            message_type: message.type_name().to_string(),
        };
        self.rw_context
            .index_transaction(result.clone())
            .during("index_transaction")?;
        self.metrics.record_applied();
        debug!(
            height = self.height,
            index,
            tx_hash = %hex::encode(tx_hash),
            message = message.type_name(),
            "[qc-17] Applied transaction"
        );
        Ok(result)
    }

    /// Apply under a save point named after the transaction hash. The save
    /// point is released on success and rolled back on failure; a failed
    /// rollback takes precedence over the transaction's own error.
    pub(crate) fn apply_with_save_point(
        &mut self,
        index: u32,
        tx_bytes: &[u8],
    ) -> Result<TxResult> {
        self.new_save_point(&hex::encode(transaction_hash(tx_bytes)))?;
        match self.apply_transaction(index, tx_bytes) {
            Ok(result) => {
                self.release_last_save_point()?;
                Ok(result)
            }
            Err(err) => {
                self.revert_last_save_point()?;
                Err(err)
            }
        }
    }
}
