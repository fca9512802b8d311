use serde::{Deserialize, Serialize};
use std::{fmt, ops::Index, str::FromStr};
use thiserror::Error;

/// A family of methods sharing one depth control.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MethodGroup {
    #[serde(rename = "EG")]
    Eg,
    #[serde(rename = "TCLL")]
    Tcll,
    #[serde(rename = "LS")]
    Ls,
    /// Not searched. Only carries the cutoff on alg variants.
    #[serde(rename = "ALG")]
    Alg,
}

impl MethodGroup {
    /// The groups the inspection search explores.
    pub const SEARCHED: [Self; 3] = [Self::Eg, Self::Tcll, Self::Ls];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Eg => "EG",
            Self::Tcll => "TCLL",
            Self::Ls => "LS",
            Self::Alg => "ALG",
        }
    }
}

impl fmt::Display for MethodGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Method {
    #[serde(rename = "CLL")]
    Cll,
    #[serde(rename = "EG-1")]
    Eg1,
    #[serde(rename = "EG-2")]
    Eg2,
    #[serde(rename = "LEG-1")]
    Leg1,
    #[serde(rename = "TCLL+")]
    TcllPlus,
    #[serde(rename = "TCLL-")]
    TcllMinus,
    #[serde(rename = "LS1")]
    Ls1,
    #[serde(rename = "LS2")]
    Ls2,
    #[serde(rename = "LS3")]
    Ls3,
    #[serde(rename = "LS4")]
    Ls4,
    #[serde(rename = "LS5")]
    Ls5,
    #[serde(rename = "LS6")]
    Ls6,
    #[serde(rename = "LS7")]
    Ls7,
    #[serde(rename = "LS8")]
    Ls8,
    #[serde(rename = "LS9")]
    Ls9,
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("Unknown method `{0}`")]
pub struct MethodParseError(String);

impl Method {
    /// Every method, in ranking priority order.
    pub const ALL: [Self; 15] = {
        use Method::*;
        let v = [
            Cll, Eg1, Eg2, Leg1, TcllPlus, TcllMinus, Ls1, Ls2, Ls3, Ls4, Ls5, Ls6, Ls7, Ls8, Ls9,
        ];

        let mut i = 0;
        while i < v.len() {
            assert!(i == v[i] as usize);
            i += 1;
        }

        v
    };

    #[must_use]
    pub fn group(self) -> MethodGroup {
        match self {
            Self::Cll | Self::Eg1 | Self::Eg2 | Self::Leg1 => MethodGroup::Eg,
            Self::TcllPlus | Self::TcllMinus => MethodGroup::Tcll,
            Self::Ls1
            | Self::Ls2
            | Self::Ls3
            | Self::Ls4
            | Self::Ls5
            | Self::Ls6
            | Self::Ls7
            | Self::Ls8
            | Self::Ls9 => MethodGroup::Ls,
        }
    }

    /// Lower ranks first when two solutions are equally efficient.
    #[must_use]
    pub fn priority(self) -> usize {
        self as usize
    }

    #[must_use]
    pub fn enabled_by_default(self) -> bool {
        matches!(self, Self::Cll | Self::Eg1 | Self::Eg2)
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Cll => "CLL",
            Self::Eg1 => "EG-1",
            Self::Eg2 => "EG-2",
            Self::Leg1 => "LEG-1",
            Self::TcllPlus => "TCLL+",
            Self::TcllMinus => "TCLL-",
            Self::Ls1 => "LS1",
            Self::Ls2 => "LS2",
            Self::Ls3 => "LS3",
            Self::Ls4 => "LS4",
            Self::Ls5 => "LS5",
            Self::Ls6 => "LS6",
            Self::Ls7 => "LS7",
            Self::Ls8 => "LS8",
            Self::Ls9 => "LS9",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Method {
    type Err = MethodParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|method| method.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| MethodParseError(s.to_owned()))
    }
}

/// Inspection depth bound per method group, plus the alg variant cutoff
/// under `alg`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DepthConfig {
    pub eg: u8,
    pub tcll: u8,
    pub ls: u8,
    pub alg: u8,
}

impl Default for DepthConfig {
    fn default() -> Self {
        Self {
            eg: 5,
            tcll: 4,
            ls: 3,
            alg: 1,
        }
    }
}

impl DepthConfig {
    #[must_use]
    pub fn uniform(depth: u8) -> Self {
        Self {
            eg: depth,
            tcll: depth,
            ls: depth,
            alg: depth,
        }
    }
}

impl Index<MethodGroup> for DepthConfig {
    type Output = u8;

    fn index(&self, group: MethodGroup) -> &Self::Output {
        match group {
            MethodGroup::Eg => &self.eg,
            MethodGroup::Tcll => &self.tcll,
            MethodGroup::Ls => &self.ls,
            MethodGroup::Alg => &self.alg,
        }
    }
}
