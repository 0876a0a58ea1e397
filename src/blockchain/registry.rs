// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Certledger Contributors

//! Registry contract client: gas estimation, signing, broadcast, and
//! confirmation for `issueCertificate`, plus the read-only details query.

use std::str::FromStr;

use alloy::{
    network::EthereumWallet,
    primitives::Address,
    providers::ProviderBuilder,
    signers::local::PrivateKeySigner,
    sol,
};
use async_trait::async_trait;

use super::types::{CertificateDetails, ChainReceipt, RegistryError};

// Define the registry interface using alloy's sol! macro
sol! {
    #[sol(rpc)]
    interface ICertificateRegistry {
        function issueCertificate(string certHash, string studentId) external;
        function getCertificateDetails(string certHash) external view
            returns (address issuer, uint256 timestamp, bool isValid, string studentId);
    }
}

/// Capability interface the reconcilers depend on.
///
/// Implementations hide all transport detail; callers only see the two
/// operation contracts.
#[async_trait]
pub trait CertificateRegistry: Send + Sync {
    /// Register a certificate hash for a student. Estimates execution cost,
    /// signs with the issuer credential, broadcasts, and waits for inclusion.
    async fn submit_certificate(
        &self,
        cert_hash: &str,
        student_id: &str,
    ) -> Result<ChainReceipt, RegistryError>;

    /// Read the on-chain record bound to a hash. Unregistered hashes come
    /// back with a zero issuer and an unset validity flag.
    async fn certificate_details(
        &self,
        cert_hash: &str,
    ) -> Result<CertificateDetails, RegistryError>;
}

/// HTTP provider type with signing capabilities (all fillers + wallet).
type SignerProvider = alloy::providers::fillers::FillProvider<
    alloy::providers::fillers::JoinFill<
        alloy::providers::fillers::JoinFill<
            alloy::providers::Identity,
            alloy::providers::fillers::JoinFill<
                alloy::providers::fillers::GasFiller,
                alloy::providers::fillers::JoinFill<
                    alloy::providers::fillers::BlobGasFiller,
                    alloy::providers::fillers::JoinFill<
                        alloy::providers::fillers::NonceFiller,
                        alloy::providers::fillers::ChainIdFiller,
                    >,
                >,
            >,
        >,
        alloy::providers::fillers::WalletFiller<EthereumWallet>,
    >,
    alloy::providers::RootProvider<alloy::network::Ethereum>,
>;

/// Alloy-backed registry client.
pub struct RegistryClient {
    contract: ICertificateRegistry::ICertificateRegistryInstance<SignerProvider>,
}

impl RegistryClient {
    /// Connect to the registry contract with signing capabilities.
    ///
    /// # Arguments
    /// * `rpc_url` - EVM JSON-RPC endpoint
    /// * `contract_address` - Deployed registry address (0x + 40 hex chars)
    /// * `issuer_private_key` - Hex private key of the issuing account
    pub fn new(
        rpc_url: &str,
        contract_address: &str,
        issuer_private_key: &str,
    ) -> Result<Self, RegistryError> {
        let url: url::Url = rpc_url
            .parse()
            .map_err(|e: url::ParseError| RegistryError::InvalidRpcUrl(e.to_string()))?;

        let address = Address::from_str(contract_address)
            .map_err(|e| RegistryError::InvalidAddress(e.to_string()))?;

        let key_hex = issuer_private_key
            .strip_prefix("0x")
            .unwrap_or(issuer_private_key);
        let key_bytes = alloy::hex::decode(key_hex)
            .map_err(|e| RegistryError::InvalidPrivateKey(e.to_string()))?;
        let signer = PrivateKeySigner::from_slice(&key_bytes)
            .map_err(|e| RegistryError::InvalidPrivateKey(e.to_string()))?;
        let wallet = EthereumWallet::from(signer);

        let provider = ProviderBuilder::new().wallet(wallet).connect_http(url);
        let contract = ICertificateRegistry::new(address, provider);

        Ok(Self { contract })
    }
}

#[async_trait]
impl CertificateRegistry for RegistryClient {
    async fn submit_certificate(
        &self,
        cert_hash: &str,
        student_id: &str,
    ) -> Result<ChainReceipt, RegistryError> {
        let call = self
            .contract
            .issueCertificate(cert_hash.to_string(), student_id.to_string());

        let gas_limit = call
            .estimate_gas()
            .await
            .map_err(|e| RegistryError::RpcError(format!("Gas estimation failed: {e}")))?;

        tracing::info!(gas_limit, hash = cert_hash, "broadcasting certificate registration");

        let pending = call
            .gas(gas_limit)
            .send()
            .await
            .map_err(|e| RegistryError::TransactionFailed(format!("Failed to send: {e}")))?;

        let receipt = pending
            .get_receipt()
            .await
            .map_err(|e| RegistryError::RpcError(format!("Failed to get receipt: {e}")))?;

        let tx_hash = format!("{:?}", receipt.transaction_hash);
        if !receipt.status() {
            return Err(RegistryError::Reverted(tx_hash));
        }

        Ok(ChainReceipt {
            tx_hash,
            block_number: receipt.block_number.unwrap_or(0),
            gas_used: receipt.gas_used as u64,
        })
    }

    async fn certificate_details(
        &self,
        cert_hash: &str,
    ) -> Result<CertificateDetails, RegistryError> {
        let result = self
            .contract
            .getCertificateDetails(cert_hash.to_string())
            .call()
            .await
            .map_err(|e| RegistryError::ContractError(e.to_string()))?;

        Ok(CertificateDetails {
            issuer: format!("{:?}", result.issuer),
            timestamp: u64::try_from(result.timestamp).unwrap_or(u64::MAX),
            is_valid: result.isValid,
            student_id: result.studentId,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_malformed_inputs() {
        let key = "0bc3e93fa64e11a175e6cefe8a098fd71d02cac7d13bc230eafbafb08e0d4aaa";

        let bad_url = RegistryClient::new("not a url", TEST_CONTRACT, key);
        assert!(matches!(bad_url, Err(RegistryError::InvalidRpcUrl(_))));

        let bad_addr = RegistryClient::new("http://127.0.0.1:7545", "0x1234", key);
        assert!(matches!(bad_addr, Err(RegistryError::InvalidAddress(_))));

        let bad_key = RegistryClient::new("http://127.0.0.1:7545", TEST_CONTRACT, "zz");
        assert!(matches!(bad_key, Err(RegistryError::InvalidPrivateKey(_))));
    }

    #[test]
    fn accepts_prefixed_and_bare_keys() {
        let key = "0bc3e93fa64e11a175e6cefe8a098fd71d02cac7d13bc230eafbafb08e0d4aaa";
        assert!(RegistryClient::new("http://127.0.0.1:7545", TEST_CONTRACT, key).is_ok());

        let prefixed = format!("0x{key}");
        assert!(RegistryClient::new("http://127.0.0.1:7545", TEST_CONTRACT, &prefixed).is_ok());
    }

    const TEST_CONTRACT: &str = "0xAa2d267756B9093Ef20F96414FD4Ce54Af98be35";
}
