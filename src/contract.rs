use cosmwasm_std::Coin;
use serde::{Serialize, Serializer};

use crate::account::Account;
use crate::chain::client::ChainClient;
use crate::chain::messages::{Execute, Instantiate};
use crate::error::Result;
use crate::json;

/// Handle to an instantiated contract
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Contract {
    address: String,
}

impl Contract {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
        }
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    /// Instantiate `code_id` and return a handle to the new contract
    pub async fn create<C, T>(
        account: &mut Account<C>,
        code_id: u64,
        init_coins: Vec<Coin>,
        init_msg: &T,
    ) -> Result<Contract>
    where
        C: ChainClient,
        T: Serialize + ?Sized,
    {
        let msg = Instantiate::new(code_id, init_msg)?.with_funds(init_coins);
        account.instantiate(msg).await
    }

    /// Pending `{method: args}` call on this contract
    pub fn execute<T: Serialize + ?Sized>(&self, method: &str, args: &T) -> Result<Execute> {
        Execute::new(self.address.clone(), &json::call(method, args)?)
    }

    /// Same as [`execute`](Self::execute), sending `funds` along
    pub fn execute_with_funds<T: Serialize + ?Sized>(
        &self,
        method: &str,
        args: &T,
        funds: Vec<Coin>,
    ) -> Result<Execute> {
        Ok(self.execute(method, args)?.with_funds(funds))
    }
}

impl std::fmt::Display for Contract {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.address)
    }
}

/// Contracts embedded in messages are referred to by address
impl Serialize for Contract {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.address)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::client::mock::MockChain;
    use crate::chain::wallet::TerraWallet;
    use crate::config::NetworkConfig;
    use cosmwasm_std::coins;
    use serde_json::json;

    #[test]
    fn test_execute_payload() {
        let dist = Contract::new("terra1dist");
        let msg = dist.execute("reserve_nft", &()).unwrap();
        assert_eq!(msg.contract, "terra1dist");
        assert_eq!(msg.json, json!({"reserve_nft": {}}));
        assert!(msg.funds.is_empty());

        let nft = Contract::new("terra1nft");
        let msg = dist
            .execute("set_nft_contract", &json!({"contract_addr": nft}))
            .unwrap();
        assert_eq!(msg.json, json!({"set_nft_contract": {"contract_addr": "terra1nft"}}));
    }

    #[test]
    fn test_execute_with_funds() {
        let msg = Contract::new("terra1dist")
            .execute_with_funds("reserve_nft", &(), coins(1_000_000, "uluna"))
            .unwrap();
        assert_eq!(msg.funds, coins(1_000_000, "uluna"));
    }

    #[tokio::test]
    async fn test_create_binds_parsed_address() {
        let chain = MockChain::new();
        let mut account = Account::with_client(
            chain.clone(),
            NetworkConfig::local(),
            TerraWallet::localterra_test1().unwrap(),
        );

        let contract = Contract::create(&mut account, 1, vec![], &json!({"count": 0}))
            .await
            .unwrap();
        assert_eq!(contract.address(), "terra1contract1");
        assert_eq!(contract.to_string(), "terra1contract1");
    }
}
