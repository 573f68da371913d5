use std::fmt;

/// Networks the tool knows how to reach on the explorer side.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Explorer {
    /// BNB Smart Chain mainnet
    Bsc,
    /// BNB Smart Chain testnet
    BscTestnet,
}

impl Explorer {
    /// Explorer used for networks the tool doesn't recognise.
    pub const FALLBACK: Self = Self::BscTestnet;

    #[must_use]
    pub fn from_network(network: &str) -> Option<Self> {
        match network {
            "bsc" => Some(Self::Bsc),
            "bscTestnet" => Some(Self::BscTestnet),
            _ => None,
        }
    }

    #[must_use]
    pub const fn network_name(self) -> &'static str {
        match self {
            Self::Bsc => "bsc",
            Self::BscTestnet => "bscTestnet",
        }
    }

    #[must_use]
    pub const fn chain_id(self) -> u64 {
        match self {
            Self::Bsc => 56,
            Self::BscTestnet => 97,
        }
    }

    /// Base URL for browsing verified contracts by hand.
    #[must_use]
    pub const fn browser_url(self) -> &'static str {
        match self {
            Self::Bsc => "https://bscscan.com/",
            Self::BscTestnet => "https://testnet.bscscan.com/",
        }
    }

    #[must_use]
    pub fn address_url(self, address: &str) -> String {
        format!("{}address/{address}#code", self.browser_url())
    }
}

impl fmt::Display for Explorer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.network_name())
    }
}

/// Explorer picked for a network, remembering whether it was a guess.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExplorerSelection {
    pub explorer: Explorer,
    pub fallback: bool,
}

impl ExplorerSelection {
    /// Unknown networks resolve to [`Explorer::FALLBACK`] and are flagged
    /// so the report can say the link is a guess.
    #[must_use]
    pub fn resolve(network: &str) -> Self {
        match Explorer::from_network(network) {
            Some(explorer) => Self {
                explorer,
                fallback: false,
            },
            None => {
                log::warn!(
                    "No block explorer known for network '{network}', falling back to {}",
                    Explorer::FALLBACK.browser_url()
                );
                Self {
                    explorer: Explorer::FALLBACK,
                    fallback: true,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mainnet_resolves_to_bscscan() {
        let selection = ExplorerSelection::resolve("bsc");
        assert_eq!(selection.explorer, Explorer::Bsc);
        assert!(!selection.fallback);
        assert_eq!(selection.explorer.browser_url(), "https://bscscan.com/");
        assert_eq!(selection.explorer.chain_id(), 56);
    }

    #[test]
    fn test_testnet_resolves_to_testnet_bscscan() {
        let selection = ExplorerSelection::resolve("bscTestnet");
        assert_eq!(selection.explorer, Explorer::BscTestnet);
        assert!(!selection.fallback);
        assert_eq!(
            selection.explorer.browser_url(),
            "https://testnet.bscscan.com/"
        );
        assert_eq!(selection.explorer.chain_id(), 97);
    }

    #[test]
    fn test_unknown_network_falls_back_explicitly() {
        let selection = ExplorerSelection::resolve("hardhat");
        assert_eq!(selection.explorer, Explorer::FALLBACK);
        assert!(selection.fallback);
    }

    #[test]
    fn test_network_names_are_case_sensitive() {
        assert!(ExplorerSelection::resolve("BSC").fallback);
    }

    #[test]
    fn test_address_url() {
        assert_eq!(
            Explorer::Bsc.address_url("0x4f47f066d839634bf4e992021a65d209B383EE1e"),
            "https://bscscan.com/address/0x4f47f066d839634bf4e992021a65d209B383EE1e#code"
        );
    }
}
