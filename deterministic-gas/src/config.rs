use {
    crate::error::{Error, Result},
    gasfuse_shared::{Gas, Msg},
    serde::{Deserialize, Serialize},
    std::collections::BTreeMap,
};

/// Gas charged once for every message on top of its type specific requirement.
///
/// Covers the message independent part of processing, like signature and auth checks.
const DEFAULT_FIXED_GAS: Gas = 50_000;

const DEFAULT_REQUIREMENTS: &[(&str, Gas)] = &[
    ("/cosmos.authz.v1beta1.MsgGrant", 28_000),
    ("/cosmos.authz.v1beta1.MsgRevoke", 8_000),
    ("/cosmos.bank.v1beta1.MsgMultiSend", 45_000),
    ("/cosmos.bank.v1beta1.MsgSend", 30_000),
    ("/cosmos.distribution.v1beta1.MsgFundCommunityPool", 50_000),
    ("/cosmos.distribution.v1beta1.MsgSetWithdrawAddress", 50_000),
    ("/cosmos.distribution.v1beta1.MsgWithdrawDelegatorReward", 65_000),
    ("/cosmos.distribution.v1beta1.MsgWithdrawValidatorCommission", 50_000),
    ("/cosmos.feegrant.v1beta1.MsgGrantAllowance", 10_000),
    ("/cosmos.feegrant.v1beta1.MsgRevokeAllowance", 2_500),
    ("/cosmos.gov.v1beta1.MsgDeposit", 52_000),
    ("/cosmos.gov.v1beta1.MsgSubmitProposal", 95_000),
    ("/cosmos.gov.v1beta1.MsgVote", 49_000),
    ("/cosmos.gov.v1beta1.MsgVoteWeighted", 53_000),
    ("/cosmos.slashing.v1beta1.MsgUnjail", 25_000),
    ("/cosmos.staking.v1beta1.MsgBeginRedelegate", 51_000),
    ("/cosmos.staking.v1beta1.MsgCreateValidator", 50_000),
    ("/cosmos.staking.v1beta1.MsgDelegate", 51_000),
    ("/cosmos.staking.v1beta1.MsgEditValidator", 50_000),
    ("/cosmos.staking.v1beta1.MsgUndelegate", 51_000),
];

/// The registry of message types with a deterministic gas requirement.
///
/// Built once at startup and shared read-only afterwards. Message types not listed here are
/// metered normally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeterministicGasConfig {
    fixed_gas: Gas,
    requirements: BTreeMap<String, Gas>,
}

impl Default for DeterministicGasConfig {
    fn default() -> Self {
        Self::new(
            DEFAULT_FIXED_GAS,
            DEFAULT_REQUIREMENTS
                .iter()
                .map(|(type_url, gas)| (type_url.to_string(), *gas)),
        )
    }
}

impl DeterministicGasConfig {
    pub fn new(fixed_gas: Gas, requirements: impl IntoIterator<Item = (String, Gas)>) -> Self {
        Self {
            fixed_gas,
            requirements: requirements.into_iter().collect(),
        }
    }

    pub fn fixed_gas(&self) -> Gas {
        self.fixed_gas
    }

    /// The gas billed for `msg`, or [`None`] if its type is not deterministic.
    pub fn gas_required_by_message(&self, msg: &impl Msg) -> Option<Gas> {
        self.requirements.get(msg.type_url()).copied()
    }

    /// Gas limit for a transaction carrying `msgs`, paying the fixed gas for each of them.
    pub fn gas_limit_by_msgs<M: Msg>(&self, msgs: &[M]) -> Result<Gas> {
        msgs.iter().try_fold(0 as Gas, |total, msg| {
            let required = self.require(msg)?;

            Ok(total
                .saturating_add(required)
                .saturating_add(self.fixed_gas))
        })
    }

    /// Gas limit for a transaction carrying `msgs` where the fixed gas is paid only once, as for
    /// a single multi-send split into parts.
    pub fn gas_limit_by_multi_send_msgs<M: Msg>(&self, msgs: &[M]) -> Result<Gas> {
        let total = msgs.iter().try_fold(0 as Gas, |total, msg| {
            self.require(msg).map(|required| total.saturating_add(required))
        })?;

        Ok(total.saturating_add(self.fixed_gas))
    }

    fn require(&self, msg: &impl Msg) -> Result<Gas> {
        self.gas_required_by_message(msg)
            .ok_or_else(|| Error::UnsupportedMessage(msg.type_url().into()))
    }
}
