//! Firewall rule and target translation.

use ipnet::IpNet;

use super::TranslationError;
use crate::hcloud::types::{
    FirewallCreateRequest, FirewallLabelSelector, FirewallResource as WireResource,
    FirewallRule as WireRule, FirewallServerRef,
};
use crate::resource::firewall::{FirewallParameters, FirewallResource, FirewallRule, TargetType};

/// Validated firewall target: exactly one variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FirewallTarget {
    Server(i64),
    LabelSelector(String),
}

impl From<FirewallTarget> for WireResource {
    fn from(target: FirewallTarget) -> Self {
        match target {
            FirewallTarget::Server(id) => WireResource::Server {
                server: FirewallServerRef { id },
            },
            FirewallTarget::LabelSelector(selector) => WireResource::LabelSelector {
                label_selector: FirewallLabelSelector { selector },
            },
        }
    }
}

/// Build the create request for a firewall named `name`.
pub fn create_request(
    name: &str,
    params: &FirewallParameters,
) -> Result<FirewallCreateRequest, TranslationError> {
    let rules = params.rules.as_deref().map(rules).transpose()?;
    let apply_to = params.apply_to.as_deref().map(targets).transpose()?;

    Ok(FirewallCreateRequest {
        name: name.to_string(),
        labels: params.labels.clone(),
        rules,
        apply_to,
    })
}

/// Translate the ordered rule list. One bad CIDR fails the whole list.
pub fn rules(rules: &[FirewallRule]) -> Result<Vec<WireRule>, TranslationError> {
    rules
        .iter()
        .enumerate()
        .map(|(idx, rule)| -> Result<WireRule, TranslationError> {
            Ok(WireRule {
                direction: rule.direction,
                protocol: rule.protocol,
                port: rule.port.clone(),
                source_ips: parse_cidrs(idx, rule.source_ips.as_deref())?,
                destination_ips: parse_cidrs(idx, rule.destination_ips.as_deref())?,
                description: rule.description.clone(),
            })
        })
        .collect()
}

/// Translate the target list. Each entry must name exactly one target.
pub fn targets(resources: &[FirewallResource]) -> Result<Vec<WireResource>, TranslationError> {
    resources
        .iter()
        .enumerate()
        .map(|(idx, res)| target(idx, res).map(WireResource::from))
        .collect()
}

/// Validate one user-declared target against its `type`.
pub fn target(index: usize, res: &FirewallResource) -> Result<FirewallTarget, TranslationError> {
    let target = match (&res.label_selector, res.server) {
        (Some(_), Some(_)) => return Err(TranslationError::AmbiguousTarget { index }),
        (None, None) => return Err(TranslationError::MissingTarget { index }),
        (Some(selector), None) => FirewallTarget::LabelSelector(selector.clone()),
        (None, Some(id)) => FirewallTarget::Server(id),
    };

    let actual = match target {
        FirewallTarget::Server(_) => TargetType::Server,
        FirewallTarget::LabelSelector(_) => TargetType::LabelSelector,
    };
    if actual != res.target_type {
        return Err(TranslationError::TargetTypeMismatch {
            index,
            declared: res.target_type,
            actual,
        });
    }
    Ok(target)
}

/// Parse CIDR strings; host bits are cleared to the network address.
fn parse_cidrs(
    rule: usize,
    cidrs: Option<&[String]>,
) -> Result<Option<Vec<IpNet>>, TranslationError> {
    let Some(cidrs) = cidrs else {
        return Ok(None);
    };

    cidrs
        .iter()
        .map(|cidr| {
            cidr.trim()
                .parse::<IpNet>()
                .map(|net| net.trunc())
                .map_err(|source| TranslationError::InvalidCidr {
                    rule,
                    cidr: cidr.clone(),
                    source,
                })
        })
        .collect::<Result<Vec<_>, _>>()
        .map(Some)
}
