use agora_ecdh::config::get_config;
use agora_ecdh::{random_private, run_exchange, Stage, UnsecureChannel};
use anyhow::Context;
use log::{info, warn};
use rand_core::OsRng;
use structopt::StructOpt;

use std::io::{self, Write};

#[derive(StructOpt)]
struct Opt {
    #[structopt(long, help = "Alice's private scalar, random when omitted")]
    alpha: Option<u64>,
    #[structopt(long, help = "Bob's private scalar, random when omitted")]
    beta: Option<u64>,
    #[structopt(long, help = "print the final knowledge of every agent as json")]
    json: bool,
}

fn main() -> Result<(), anyhow::Error> {
    let _ = env_logger::try_init();
    let opt = Opt::from_args();

    let settings = get_config()?;
    let group = settings
        .curve_group()
        .context("failed to enumerate the subgroup")?;
    if !group.is_on_curve(group.generator()) {
        warn!("base point {} is not on the curve", group.generator());
    }

    let mut rng = OsRng;
    let alpha = match opt.alpha {
        Some(alpha) => alpha,
        None => random_private(&mut rng, &group)?,
    };
    let beta = match opt.beta {
        Some(beta) => beta,
        None => random_private(&mut rng, &group)?,
    };

    let mut channel = UnsecureChannel::new();
    let alice = channel.register("Alice");
    let bob = channel.register("Bob");

    let stdout = io::stdout();
    let mut out = stdout.lock();
    channel.dump(&mut out)?;

    let outcome = run_exchange(
        &mut channel,
        &group,
        alice,
        bob,
        alpha,
        beta,
        |stage, channel| {
            match stage {
                Stage::Group => writeln!(out, "{}", group)?,
                _ => channel.dump(&mut out)?,
            }
            Ok(())
        },
    )?;

    if opt.json {
        serde_json::to_writer_pretty(&mut out, channel.listeners())?;
        writeln!(out)?;
    }

    if outcome.agreed() {
        info!("shared secret agreed: {}", outcome.alice_secret);
    } else {
        warn!(
            "shared secrets differ: {} and {}",
            outcome.alice_secret, outcome.bob_secret
        );
    }
    Ok(())
}
