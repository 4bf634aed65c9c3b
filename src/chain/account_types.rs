/// Decoding of the account types the auth module can return.
///
/// `cosmos.auth.v1beta1.Query/Account` wraps the account in a
/// `google.protobuf.Any`; the concrete type decides where the sequence and
/// account number live.

use cosmos_sdk_proto::cosmos::auth::v1beta1::{BaseAccount, ModuleAccount};
use cosmos_sdk_proto::cosmos::vesting::v1beta1::{
    BaseVestingAccount, ContinuousVestingAccount, DelayedVestingAccount, PeriodicVestingAccount,
    PermanentLockedAccount,
};
use prost::Message;

use crate::error::Result;

#[derive(Debug, Clone)]
pub enum ChainAccount {
    Base(BaseAccount),
    Module(ModuleAccount),
    ContinuousVesting(ContinuousVestingAccount),
    DelayedVesting(DelayedVestingAccount),
    PeriodicVesting(PeriodicVestingAccount),
    PermanentLocked(PermanentLockedAccount),
    Unsupported { type_url: String },
}

/// Signing-relevant fields of any account
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccountInfo {
    pub address: String,
    pub sequence: u64,
    pub account_number: u64,
}

impl ChainAccount {
    pub fn decode_any(type_url: &str, value: &[u8]) -> Result<Self> {
        let account = match type_url {
            "/cosmos.auth.v1beta1.BaseAccount" => ChainAccount::Base(BaseAccount::decode(value)?),
            "/cosmos.auth.v1beta1.ModuleAccount" => {
                ChainAccount::Module(ModuleAccount::decode(value)?)
            }
            "/cosmos.vesting.v1beta1.ContinuousVestingAccount" => {
                ChainAccount::ContinuousVesting(ContinuousVestingAccount::decode(value)?)
            }
            "/cosmos.vesting.v1beta1.DelayedVestingAccount" => {
                ChainAccount::DelayedVesting(DelayedVestingAccount::decode(value)?)
            }
            "/cosmos.vesting.v1beta1.PeriodicVestingAccount" => {
                ChainAccount::PeriodicVesting(PeriodicVestingAccount::decode(value)?)
            }
            "/cosmos.vesting.v1beta1.PermanentLockedAccount" => {
                ChainAccount::PermanentLocked(PermanentLockedAccount::decode(value)?)
            }
            unsupported => {
                log::warn!("Encountered unsupported account type: {}", unsupported);
                ChainAccount::Unsupported {
                    type_url: unsupported.to_string(),
                }
            }
        };
        Ok(account)
    }

    fn base_account(&self) -> Option<&BaseAccount> {
        fn from_vesting(v: &Option<BaseVestingAccount>) -> Option<&BaseAccount> {
            v.as_ref().and_then(|v| v.base_account.as_ref())
        }

        match self {
            ChainAccount::Base(base) => Some(base),
            ChainAccount::Module(module) => module.base_account.as_ref(),
            ChainAccount::ContinuousVesting(a) => from_vesting(&a.base_vesting_account),
            ChainAccount::DelayedVesting(a) => from_vesting(&a.base_vesting_account),
            ChainAccount::PeriodicVesting(a) => from_vesting(&a.base_vesting_account),
            ChainAccount::PermanentLocked(a) => from_vesting(&a.base_vesting_account),
            ChainAccount::Unsupported { .. } => None,
        }
    }

    pub fn account_info(&self) -> Option<AccountInfo> {
        self.base_account().map(|base| AccountInfo {
            address: base.address.clone(),
            sequence: base.sequence,
            account_number: base.account_number,
        })
    }

    pub fn account_type(&self) -> &str {
        match self {
            ChainAccount::Base(_) => "BaseAccount",
            ChainAccount::Module(_) => "ModuleAccount",
            ChainAccount::ContinuousVesting(_) => "ContinuousVestingAccount",
            ChainAccount::DelayedVesting(_) => "DelayedVestingAccount",
            ChainAccount::PeriodicVesting(_) => "PeriodicVestingAccount",
            ChainAccount::PermanentLocked(_) => "PermanentLockedAccount",
            ChainAccount::Unsupported { type_url } => type_url,
        }
    }
}
