use agora_curve::{CurveError, CurveGroup, CurvePoint};
use anyhow::Context;
use config::{Config, Environment};
use dotenv::dotenv;

pub const ENV_PREFIX: &str = "ECDH";

/// Curve parameters of the exchange. Defaults to the curve
/// `y^2 = x^3 + 2x + 2 (mod 17)` with base point `(5, 1)`.
#[derive(serde::Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub a: u64,
    pub b: u64,
    pub p: u64,
    pub gx: u64,
    pub gy: u64,
}

impl Settings {
    pub fn generator(&self) -> CurvePoint {
        CurvePoint::from_u64(self.gx, self.gy)
    }

    pub fn curve_group(&self) -> Result<CurveGroup, CurveError> {
        CurveGroup::from_u64(self.a, self.b, self.p, self.generator())
    }
}

/// Reads `ECDH_*` variables, after loading a `.env` file if there is one.
pub fn get_config() -> Result<Settings, anyhow::Error> {
    dotenv().ok();
    load(Environment::with_prefix(ENV_PREFIX))
}

fn load(environment: Environment) -> Result<Settings, anyhow::Error> {
    let conf = Config::builder()
        .set_default("a", 2_i64)?
        .set_default("b", 2_i64)?
        .set_default("p", 17_i64)?
        .set_default("gx", 5_i64)?
        .set_default("gy", 1_i64)?
        .add_source(environment.try_parsing(true))
        .build()
        .context("failed to load config")?;

    conf.try_deserialize()
        .context("failed to deserialize config")
}
