//! Mock wallet for testing.
//!
//! Simulates a wallet attached to an in-memory chain that has the registry
//! contract deployed at a fixed address on one chain. Calldata is decoded with
//! the real ABI, so code above the provider runs unmodified against it.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

use alloy_primitives::{Address, B256, Bytes, U256, hex};
use alloy_sol_types::{SolInterface, SolValue};
use async_trait::async_trait;
use serde_json::{Value, json};
use tokio::sync::broadcast;

use crate::contract::IKotRegistry::{self, IKotRegistryCalls};
use crate::traits::{ProviderError, ProviderEvent, WalletProvider, codes, methods};
use crate::types::{
    CallRequest, ChainDescriptor, ChainId, Receipt, ReceiptStatus, TransactionRequest, TxHash,
};

const ONE_ETHER: u128 = 1_000_000_000_000_000_000;

/// Knobs controlling how the mock wallet answers.
#[derive(Debug, Clone)]
pub struct MockBehavior {
    /// `eth_requestAccounts` fails with 4001.
    pub reject_connect: bool,
    /// `eth_sendTransaction` fails with 4001.
    pub reject_transactions: bool,
    /// `wallet_switchEthereumChain` fails with 4001.
    pub reject_switch: bool,
    /// `wallet_addEthereumChain` fails.
    pub fail_add_chain: bool,
    /// `setRecord` transactions are mined with status 0.
    pub revert_set_record: bool,
    /// Receipts stay pending until [`MockWallet::release_pending`] is called.
    pub hold_receipts: bool,
    /// Contract-side maximum name length.
    pub max_name_length: usize,
}

impl Default for MockBehavior {
    fn default() -> Self {
        Self {
            reject_connect: false,
            reject_transactions: false,
            reject_switch: false,
            fail_add_chain: false,
            revert_set_record: false,
            hold_receipts: false,
            max_name_length: 10,
        }
    }
}

struct MockChain {
    accounts: Vec<Address>,
    granted: bool,
    chain_id: ChainId,
    known_chains: HashSet<ChainId>,
    added_chains: Vec<ChainDescriptor>,
    registry: Address,
    registry_chain: ChainId,
    names: Vec<String>,
    domains: HashMap<String, Address>,
    records: HashMap<String, String>,
    balances: HashMap<Address, U256>,
    receipts: HashMap<TxHash, Receipt>,
    pending: HashMap<TxHash, Receipt>,
    tx_counter: u64,
    calls: Vec<String>,
    behavior: MockBehavior,
}

/// In-memory wallet + chain + registry contract.
#[derive(Clone)]
pub struct MockWallet {
    chain: Arc<Mutex<MockChain>>,
    events: broadcast::Sender<ProviderEvent>,
}

impl MockWallet {
    /// Account used by [`MockWallet::new`].
    pub const ALICE: Address = Address::repeat_byte(0xa1);
    /// Second account, for ownership checks.
    pub const BOB: Address = Address::repeat_byte(0xb0);
    /// Default registry address.
    pub const REGISTRY: Address = Address::repeat_byte(0x42);

    /// Wallet on `registry_chain` holding [`MockWallet::ALICE`] (not yet granted).
    pub fn new(registry_chain: ChainId) -> Self {
        let (events, _) = broadcast::channel(32);
        let mut known_chains = HashSet::new();
        known_chains.insert(ChainId(1));
        known_chains.insert(registry_chain);

        let mut balances = HashMap::new();
        balances.insert(Self::ALICE, U256::from(10 * ONE_ETHER));
        balances.insert(Self::BOB, U256::from(10 * ONE_ETHER));

        Self {
            chain: Arc::new(Mutex::new(MockChain {
                accounts: vec![Self::ALICE],
                granted: false,
                chain_id: registry_chain,
                known_chains,
                added_chains: Vec::new(),
                registry: Self::REGISTRY,
                registry_chain,
                names: Vec::new(),
                domains: HashMap::new(),
                records: HashMap::new(),
                balances,
                receipts: HashMap::new(),
                pending: HashMap::new(),
                tx_counter: 0,
                calls: Vec::new(),
                behavior: MockBehavior::default(),
            })),
            events,
        }
    }

    /// Accounts the wallet exposes once access is granted.
    pub fn with_accounts(self, accounts: Vec<Address>) -> Self {
        self.lock().accounts = accounts;
        self
    }

    /// Pretend the user already granted access in an earlier session.
    pub fn granted(self) -> Self {
        self.lock().granted = true;
        self
    }

    /// Start on a different active chain.
    pub fn on_chain(self, chain_id: ChainId) -> Self {
        self.lock().chain_id = chain_id;
        self
    }

    /// Forget a chain so that switching to it reports 4902.
    pub fn without_chain(self, chain_id: ChainId) -> Self {
        self.lock().known_chains.remove(&chain_id);
        self
    }

    pub fn with_behavior(self, behavior: MockBehavior) -> Self {
        self.lock().behavior = behavior;
        self
    }

    pub fn with_balance(self, account: Address, wei: U256) -> Self {
        self.lock().balances.insert(account, wei);
        self
    }

    pub fn set_behavior(&self, update: impl FnOnce(&mut MockBehavior)) {
        update(&mut self.lock().behavior);
    }

    /// Register a name directly in contract storage.
    pub fn seed_name(&self, name: &str, owner: Address, record: &str) {
        let mut chain = self.lock();
        chain.names.push(name.to_string());
        chain.domains.insert(name.to_string(), owner);
        chain.records.insert(name.to_string(), record.to_string());
    }

    /// Switch the wallet's active chain from "outside" and emit `chainChanged`.
    pub fn emit_chain_changed(&self, chain_id: ChainId) {
        self.lock().chain_id = chain_id;
        let _ = self.events.send(ProviderEvent::ChainChanged(chain_id));
    }

    /// Change the exposed accounts from "outside" and emit `accountsChanged`.
    pub fn emit_accounts_changed(&self, accounts: Vec<Address>) {
        {
            let mut chain = self.lock();
            chain.granted = !accounts.is_empty();
            chain.accounts = accounts.clone();
        }
        let _ = self.events.send(ProviderEvent::AccountsChanged(accounts));
    }

    /// Mine every held transaction.
    pub fn release_pending(&self) {
        let mut chain = self.lock();
        let pending: Vec<_> = chain.pending.drain().collect();
        chain.receipts.extend(pending);
    }

    pub fn chain_id(&self) -> ChainId {
        self.lock().chain_id
    }

    pub fn added_chains(&self) -> Vec<ChainDescriptor> {
        self.lock().added_chains.clone()
    }

    pub fn names(&self) -> Vec<String> {
        self.lock().names.clone()
    }

    pub fn owner_of(&self, name: &str) -> Option<Address> {
        self.lock().domains.get(name).copied()
    }

    pub fn record_of(&self, name: &str) -> Option<String> {
        self.lock().records.get(name).cloned()
    }

    pub fn balance_of(&self, account: Address) -> U256 {
        self.lock().balances.get(&account).copied().unwrap_or_default()
    }

    /// Every method requested so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.lock().calls.clone()
    }

    pub fn call_count(&self, method: &str) -> usize {
        self.lock().calls.iter().filter(|m| *m == method).count()
    }

    pub fn clear_calls(&self) {
        self.lock().calls.clear();
    }

    fn lock(&self) -> MutexGuard<'_, MockChain> {
        self.chain.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl WalletProvider for MockWallet {
    async fn request(&self, method: &str, params: Value) -> Result<Value, ProviderError> {
        let mut emitted = None;
        let result = {
            let mut chain = self.lock();
            chain.calls.push(method.to_string());
            chain.handle(method, &params, &mut emitted)
        };
        if let Some(event) = emitted {
            let _ = self.events.send(event);
        }
        result
    }

    fn subscribe(&self) -> broadcast::Receiver<ProviderEvent> {
        self.events.subscribe()
    }

    fn name(&self) -> &str {
        "mock-wallet"
    }
}

impl MockChain {
    fn handle(
        &mut self,
        method: &str,
        params: &Value,
        emitted: &mut Option<ProviderEvent>,
    ) -> Result<Value, ProviderError> {
        match method {
            methods::ACCOUNTS => Ok(json!(self.exposed_accounts())),
            methods::REQUEST_ACCOUNTS => {
                if self.behavior.reject_connect {
                    return Err(ProviderError::rpc(
                        codes::USER_REJECTED,
                        "User rejected the request.",
                    ));
                }
                self.granted = true;
                Ok(json!(self.exposed_accounts()))
            }
            methods::CHAIN_ID => Ok(json!(self.chain_id.to_hex())),
            methods::SWITCH_CHAIN => {
                let target: ChainId = first_field(params, "chainId")?;
                if self.behavior.reject_switch {
                    return Err(ProviderError::rpc(
                        codes::USER_REJECTED,
                        "User rejected the request.",
                    ));
                }
                if !self.known_chains.contains(&target) {
                    return Err(ProviderError::rpc(
                        codes::UNRECOGNIZED_CHAIN,
                        format!("Unrecognized chain ID \"{}\"", target.to_hex()),
                    ));
                }
                self.activate(target, emitted);
                Ok(Value::Null)
            }
            methods::ADD_CHAIN => {
                let descriptor: ChainDescriptor = first_param(params)?;
                if self.behavior.fail_add_chain {
                    return Err(ProviderError::rpc(codes::INTERNAL_ERROR, "Failed to add chain"));
                }
                self.known_chains.insert(descriptor.chain_id);
                self.activate(descriptor.chain_id, emitted);
                self.added_chains.push(descriptor);
                Ok(Value::Null)
            }
            methods::SEND_TRANSACTION => {
                let tx: TransactionRequest = first_param(params)?;
                self.send_transaction(tx)
            }
            methods::TRANSACTION_RECEIPT => {
                let hash: TxHash = first_param(params)?;
                match self.receipts.get(&hash) {
                    Some(receipt) => serde_json::to_value(receipt)
                        .map_err(|e| ProviderError::Decode(e.to_string())),
                    None => Ok(Value::Null),
                }
            }
            methods::CALL => {
                let call: CallRequest = first_param(params)?;
                let output = self.call(call)?;
                Ok(json!(hex::encode_prefixed(output)))
            }
            other => Err(ProviderError::rpc(
                codes::METHOD_NOT_FOUND,
                format!("the method {other} does not exist/is not available"),
            )),
        }
    }

    fn exposed_accounts(&self) -> Vec<Address> {
        if self.granted {
            self.accounts.clone()
        } else {
            Vec::new()
        }
    }

    fn activate(&mut self, target: ChainId, emitted: &mut Option<ProviderEvent>) {
        if self.chain_id != target {
            self.chain_id = target;
            *emitted = Some(ProviderEvent::ChainChanged(target));
        }
    }

    fn contract_live(&self, to: Address) -> bool {
        to == self.registry && self.chain_id == self.registry_chain
    }

    fn send_transaction(&mut self, tx: TransactionRequest) -> Result<Value, ProviderError> {
        if self.behavior.reject_transactions {
            return Err(ProviderError::rpc(
                codes::USER_REJECTED,
                "MetaMask Tx Signature: User denied transaction signature.",
            ));
        }
        if !self.exposed_accounts().contains(&tx.from) {
            return Err(ProviderError::rpc(
                codes::UNAUTHORIZED,
                "The requested account has not been authorized by the user.",
            ));
        }

        let value = tx.value.unwrap_or_default();
        let balance = self.balances.get(&tx.from).copied().unwrap_or_default();
        if balance < value {
            return Err(ProviderError::rpc(
                codes::SERVER_ERROR,
                "insufficient funds for gas * price + value",
            ));
        }

        let success = if self.contract_live(tx.to) {
            self.execute(tx.from, value, &tx.data)
        } else {
            true
        };
        if success {
            self.balances.insert(tx.from, balance - value);
        }

        self.tx_counter += 1;
        let hash = B256::left_padding_from(&self.tx_counter.to_be_bytes());
        let receipt = Receipt {
            transaction_hash: hash,
            block_number: Some(self.tx_counter),
            status: if success {
                ReceiptStatus::Success
            } else {
                ReceiptStatus::Failure
            },
        };
        if self.behavior.hold_receipts {
            self.pending.insert(hash, receipt);
        } else {
            self.receipts.insert(hash, receipt);
        }
        Ok(json!(hash))
    }

    /// Runs a state-changing registry call; `false` means the call reverted.
    fn execute(&mut self, from: Address, value: U256, data: &Bytes) -> bool {
        let Ok(call) = IKotRegistryCalls::abi_decode(data, true) else {
            return false;
        };
        match call {
            IKotRegistryCalls::register(IKotRegistry::registerCall { name }) => {
                let length = name.chars().count();
                if length < 3 || length > self.behavior.max_name_length {
                    return false;
                }
                if self.domains.contains_key(&name) || value < contract_price(length) {
                    return false;
                }
                self.names.push(name.clone());
                self.domains.insert(name, from);
                true
            }
            IKotRegistryCalls::setRecord(IKotRegistry::setRecordCall { name, record }) => {
                if self.behavior.revert_set_record || self.domains.get(&name) != Some(&from) {
                    return false;
                }
                self.records.insert(name, record);
                true
            }
            _ => false,
        }
    }

    fn call(&self, call: CallRequest) -> Result<Vec<u8>, ProviderError> {
        if !self.contract_live(call.to) {
            return Ok(Vec::new());
        }
        let decoded = IKotRegistryCalls::abi_decode(&call.data, true)
            .map_err(|_| ProviderError::rpc(codes::SERVER_ERROR, "execution reverted"))?;
        let output = match decoded {
            IKotRegistryCalls::getAllNames(_) => self.names.abi_encode(),
            IKotRegistryCalls::records(IKotRegistry::recordsCall { name }) => self
                .records
                .get(&name)
                .cloned()
                .unwrap_or_default()
                .abi_encode(),
            IKotRegistryCalls::domains(IKotRegistry::domainsCall { name }) => self
                .domains
                .get(&name)
                .copied()
                .unwrap_or(Address::ZERO)
                .abi_encode(),
            _ => return Err(ProviderError::rpc(codes::SERVER_ERROR, "execution reverted")),
        };
        Ok(output)
    }
}

/// Contract-side price list, in wei.
fn contract_price(length: usize) -> U256 {
    let tenths = match length {
        3 => 5,
        4 => 3,
        _ => 1,
    };
    U256::from(tenths * ONE_ETHER / 10)
}

fn first_param<T: serde::de::DeserializeOwned>(params: &Value) -> Result<T, ProviderError> {
    let first = params
        .get(0)
        .cloned()
        .ok_or_else(|| ProviderError::rpc(-32602, "missing params"))?;
    serde_json::from_value(first).map_err(|e| ProviderError::rpc(-32602, e.to_string()))
}

fn first_field<T: serde::de::DeserializeOwned>(
    params: &Value,
    field: &str,
) -> Result<T, ProviderError> {
    let value = params
        .get(0)
        .and_then(|p| p.get(field))
        .cloned()
        .ok_or_else(|| ProviderError::rpc(-32602, format!("missing {field}")))?;
    serde_json::from_value(value).map_err(|e| ProviderError::rpc(-32602, e.to_string()))
}
