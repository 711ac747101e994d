mod phase;

pub use phase::{Agreed, Committed, Setup};

use crate::channel::ListenerId;

use agora_curve::{CurveGroup, CurvePoint};
use anyhow::ensure;
use log::warn;
use rand::Rng;
use rand_core::{CryptoRng, RngCore};

/// One side of the exchange, moving through `Setup -> Committed -> Agreed`.
pub struct Participant<P> {
    id: ListenerId,
    group: CurveGroup,
    phase: P,
}

impl<P> Participant<P> {
    pub fn id(&self) -> ListenerId {
        self.id
    }

    pub fn group(&self) -> &CurveGroup {
        &self.group
    }
}

/// Draws a private scalar uniformly from `[1, n)`.
pub fn random_private<R: RngCore + CryptoRng>(
    rng: &mut R,
    group: &CurveGroup,
) -> Result<u64, anyhow::Error> {
    let order = group.order() as u64;
    ensure!(order > 1, "subgroup too small to pick a private scalar");
    Ok(rng.gen_range(1..order))
}

impl Participant<Setup> {
    pub fn new(id: ListenerId, group: CurveGroup) -> Self {
        Self {
            id,
            group,
            phase: Setup,
        }
    }

    pub fn commit(self, private: u64) -> Result<Participant<Committed>, anyhow::Error> {
        ensure!(
            private >= 1 && private < self.group.order() as u64,
            "private scalar out of range"
        );
        let public = self.group.scale(self.group.generator(), private)?;
        if public.has_zero_x() {
            warn!(
                "public point {} has x == 0, peers may derive different secrets",
                public
            );
        }
        Ok(Participant {
            id: self.id,
            group: self.group,
            phase: Committed { private, public },
        })
    }

    pub fn commit_random<R: RngCore + CryptoRng>(
        self,
        rng: &mut R,
    ) -> Result<Participant<Committed>, anyhow::Error> {
        let private = random_private(rng, &self.group)?;
        self.commit(private)
    }
}

impl Participant<Committed> {
    pub fn private(&self) -> u64 {
        self.phase.private
    }

    pub fn public(&self) -> &CurvePoint {
        &self.phase.public
    }

    pub fn agree(self, peer_public: &CurvePoint) -> Result<Participant<Agreed>, anyhow::Error> {
        let shared_secret = self.group.scale(peer_public, self.phase.private)?;
        Ok(Participant {
            id: self.id,
            group: self.group,
            phase: Agreed {
                private: self.phase.private,
                public: self.phase.public,
                shared_secret,
            },
        })
    }
}

impl Participant<Agreed> {
    pub fn private(&self) -> u64 {
        self.phase.private
    }

    pub fn public(&self) -> &CurvePoint {
        &self.phase.public
    }

    pub fn shared_secret(&self) -> &CurvePoint {
        &self.phase.shared_secret
    }
}
