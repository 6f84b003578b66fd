//! P2WSH hash time-locked contract on Bitcoin.
//!
//! Script structure:
//! ```text
//! OP_IF
//!   OP_SHA256 <secret_hash> OP_EQUALVERIFY OP_DUP OP_HASH160 <redeemer_pkh>
//! OP_ELSE
//!   <timelock> OP_CSV OP_DROP OP_DUP OP_HASH160 <initiator_pkh>
//! OP_ENDIF
//! OP_EQUALVERIFY OP_CHECKSIG
//! ```
//!
//! The redeemer spends with `[sig, pubkey, secret, 0x01, script]`; the
//! initiator can refund after `timelock` blocks through the else branch.

use bitcoin::absolute::LockTime;
use bitcoin::opcodes::all::{
    OP_CHECKSIG, OP_CSV, OP_DROP, OP_DUP, OP_ELSE, OP_ENDIF, OP_EQUALVERIFY, OP_HASH160, OP_IF,
    OP_SHA256,
};
use bitcoin::script::Builder;
use bitcoin::sighash::{EcdsaSighashType, SighashCache};
use bitcoin::transaction::Version;
use bitcoin::{
    ecdsa, Address, Amount, Network, PublicKey, Script, ScriptBuf, Sequence, Transaction, TxIn,
    TxOut, WitnessVersion, Witness,
};
use std::str::FromStr;

use crate::btc::esplora::Utxo;
use crate::btc::wallet::BitcoinWallet;
use crate::btc::{BitcoinError, Result};

/// Outputs below this value are not relayed.
pub const DUST_LIMIT_SATS: u64 = 546;

const TX_OVERHEAD_VBYTES: u64 = 11;
const P2WPKH_INPUT_VBYTES: u64 = 68;
const P2WPKH_OUTPUT_VBYTES: u64 = 31;
const P2WSH_OUTPUT_VBYTES: u64 = 43;
const HTLC_REDEEM_INPUT_VBYTES: u64 = 102;

/// Parameters that fully determine an HTLC script.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HtlcParams {
    /// SHA256 of the secret.
    pub secret_hash: [u8; 32],
    /// HASH160 of the key that can claim with the secret.
    pub redeemer_pkh: [u8; 20],
    /// HASH160 of the key that can refund after the timelock.
    pub initiator_pkh: [u8; 20],
    /// Relative timelock in blocks.
    pub timelock: u32,
}

impl HtlcParams {
    /// The witness script.
    #[must_use]
    pub fn script(&self) -> ScriptBuf {
        Builder::new()
            .push_opcode(OP_IF)
            .push_opcode(OP_SHA256)
            .push_slice(self.secret_hash)
            .push_opcode(OP_EQUALVERIFY)
            .push_opcode(OP_DUP)
            .push_opcode(OP_HASH160)
            .push_slice(self.redeemer_pkh)
            .push_opcode(OP_ELSE)
            .push_int(i64::from(self.timelock))
            .push_opcode(OP_CSV)
            .push_opcode(OP_DROP)
            .push_opcode(OP_DUP)
            .push_opcode(OP_HASH160)
            .push_slice(self.initiator_pkh)
            .push_opcode(OP_ENDIF)
            .push_opcode(OP_EQUALVERIFY)
            .push_opcode(OP_CHECKSIG)
            .into_script()
    }

    /// P2WSH address locking funds to the script.
    #[must_use]
    pub fn address(&self, network: Network) -> Address {
        Address::p2wsh(&self.script(), network)
    }
}

/// Parse an address for `network`.
pub fn parse_address(address: &str, network: Network) -> Result<Address> {
    Address::from_str(address)
        .map_err(|e| BitcoinError::Address(format!("{address}: {e}")))?
        .require_network(network)
        .map_err(|e| BitcoinError::Address(format!("{address}: {e}")))
}

/// HASH160 committed to by a P2WPKH address.
pub fn pubkey_hash_from_address(address: &str, network: Network) -> Result<[u8; 20]> {
    let address = parse_address(address, network)?;
    let program = address
        .witness_program()
        .filter(|p| p.version() == WitnessVersion::V0)
        .ok_or_else(|| BitcoinError::Address(format!("{address} is not a segwit v0 address")))?;

    <[u8; 20]>::try_from(program.program().as_bytes())
        .map_err(|_| BitcoinError::Address(format!("{address} is not a P2WPKH address")))
}

/// Build and sign a transaction paying `amount` sats to `destination`
/// from the wallet's UTXOs.
///
/// UTXOs are selected largest first. Change below the dust limit is left
/// to the fee.
pub fn build_funding_tx(
    wallet: &BitcoinWallet,
    utxos: &[Utxo],
    destination: &Address,
    amount: u64,
    fee_rate: u64,
) -> Result<Transaction> {
    let mut candidates: Vec<&Utxo> = utxos.iter().collect();
    candidates.sort_by(|a, b| b.value.cmp(&a.value));

    let available = candidates.iter().fold(0u64, |sum, u| sum.saturating_add(u.value));
    let mut selected = Vec::new();
    let mut total = 0u64;
    let mut needed = amount;

    for utxo in candidates {
        selected.push(utxo);
        total = total.saturating_add(utxo.value);
        let vbytes = TX_OVERHEAD_VBYTES
            + P2WPKH_INPUT_VBYTES * selected.len() as u64
            + P2WSH_OUTPUT_VBYTES
            + P2WPKH_OUTPUT_VBYTES;
        needed = amount
            .checked_add(fee_for(vbytes, fee_rate)?)
            .ok_or_else(|| BitcoinError::Transaction(format!("{amount} sats plus fee overflows")))?;
        if total >= needed {
            break;
        }
    }

    if selected.is_empty() || total < needed {
        return Err(BitcoinError::InsufficientFunds { needed, available });
    }

    let wallet_script = wallet.address().script_pubkey();
    let mut input = Vec::with_capacity(selected.len());
    let mut prevouts = Vec::with_capacity(selected.len());
    for utxo in &selected {
        input.push(TxIn {
            previous_output: utxo.outpoint()?,
            script_sig: ScriptBuf::new(),
            sequence: Sequence::ENABLE_RBF_NO_LOCKTIME,
            witness: Witness::default(),
        });
        prevouts.push(TxOut {
            value: utxo.amount(),
            script_pubkey: wallet_script.clone(),
        });
    }

    let mut output = vec![TxOut {
        value: Amount::from_sat(amount),
        script_pubkey: destination.script_pubkey(),
    }];
    let change = total - needed;
    if change > DUST_LIMIT_SATS {
        output.push(TxOut {
            value: Amount::from_sat(change),
            script_pubkey: wallet_script,
        });
    }

    let mut tx = Transaction {
        version: Version::TWO,
        lock_time: LockTime::ZERO,
        input,
        output,
    };
    wallet.sign_p2wpkh_inputs(&mut tx, &prevouts)?;
    Ok(tx)
}

/// Build and sign a transaction sweeping every HTLC output to the wallet
/// by revealing `secret`.
pub fn build_redeem_tx(
    wallet: &BitcoinWallet,
    htlc_utxos: &[Utxo],
    script: &Script,
    secret: &[u8; 32],
    fee_rate: u64,
) -> Result<Transaction> {
    if htlc_utxos.is_empty() {
        return Err(BitcoinError::Transaction("no HTLC outputs to redeem".to_string()));
    }

    let total = htlc_utxos.iter().fold(0u64, |sum, u| sum.saturating_add(u.value));
    let vbytes = TX_OVERHEAD_VBYTES
        + HTLC_REDEEM_INPUT_VBYTES * htlc_utxos.len() as u64
        + P2WPKH_OUTPUT_VBYTES;
    let fee = fee_for(vbytes, fee_rate)?;
    if total <= fee.saturating_add(DUST_LIMIT_SATS) {
        return Err(BitcoinError::InsufficientFunds {
            needed: fee.saturating_add(DUST_LIMIT_SATS + 1),
            available: total,
        });
    }

    let input = htlc_utxos
        .iter()
        .map(|utxo| {
            Ok(TxIn {
                previous_output: utxo.outpoint()?,
                script_sig: ScriptBuf::new(),
                sequence: Sequence::ENABLE_RBF_NO_LOCKTIME,
                witness: Witness::default(),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let mut tx = Transaction {
        version: Version::TWO,
        lock_time: LockTime::ZERO,
        input,
        output: vec![TxOut {
            value: Amount::from_sat(total - fee),
            script_pubkey: wallet.address().script_pubkey(),
        }],
    };

    let pubkey = PublicKey::from(*wallet.public_key());
    let mut cache = SighashCache::new(&mut tx);
    for (index, utxo) in htlc_utxos.iter().enumerate() {
        let sighash = cache
            .p2wsh_signature_hash(index, script, utxo.amount(), EcdsaSighashType::All)
            .map_err(|e| BitcoinError::Sighash(e.to_string()))?;
        let signature = wallet.sign_segwit_v0(sighash);

        let witness = cache
            .witness_mut(index)
            .ok_or_else(|| BitcoinError::Sighash(format!("no input at index {index}")))?;
        *witness = redeem_witness(&signature, &pubkey, secret, script);
    }

    Ok(tx)
}

fn fee_for(vbytes: u64, fee_rate: u64) -> Result<u64> {
    vbytes
        .checked_mul(fee_rate)
        .ok_or_else(|| BitcoinError::Transaction(format!("fee rate {fee_rate} sat/vB overflows")))
}

/// Witness taking the secret branch: `[sig, pubkey, secret, 0x01, script]`.
#[must_use]
pub fn redeem_witness(
    signature: &ecdsa::Signature,
    pubkey: &PublicKey,
    secret: &[u8; 32],
    script: &Script,
) -> Witness {
    let mut witness = Witness::new();
    witness.push(signature.to_vec());
    witness.push(pubkey.to_bytes());
    witness.push(secret);
    witness.push([0x01]);
    witness.push(script.as_bytes());
    witness
}
