use crate::channel::{ListenerId, UnsecureChannel};
use crate::participant::Participant;

use agora_curve::{CurveGroup, CurvePoint};

pub const TAG_A: &str = "a";
pub const TAG_B: &str = "b";
pub const TAG_P: &str = "p";
pub const TAG_GENERATOR: &str = "g";
pub const TAG_GROUP: &str = "G";
pub const TAG_ALICE_PRIVATE: &str = "alpha";
pub const TAG_BOB_PRIVATE: &str = "beta";
pub const TAG_ALICE_PUBLIC: &str = "A";
pub const TAG_BOB_PUBLIC: &str = "B";
pub const TAG_SHARED_SECRET: &str = "AB";

/// Points in the exchange where the observer gets to look at the channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    /// `a`, `b`, `p` and `g` were broadcast.
    Parameters,
    /// The enumerated group was broadcast.
    Group,
    /// Both parties noted their private scalar.
    Private,
    /// Both public points were broadcast.
    Public,
    /// Both parties noted the shared secret they derived.
    Secret,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExchangeOutcome {
    pub alice_public: CurvePoint,
    pub bob_public: CurvePoint,
    pub alice_secret: CurvePoint,
    pub bob_secret: CurvePoint,
}

impl ExchangeOutcome {
    pub fn agreed(&self) -> bool {
        self.alice_secret == self.bob_secret
    }
}

/// Runs a full Diffie-Hellman exchange between two registered listeners.
///
/// Public values go through [`UnsecureChannel::broadcast`], so the
/// eavesdropper sees all of them; private scalars and derived secrets are only
/// noted with their owner.
pub fn run_exchange<F>(
    channel: &mut UnsecureChannel,
    group: &CurveGroup,
    alice: ListenerId,
    bob: ListenerId,
    alpha: u64,
    beta: u64,
    mut observe: F,
) -> Result<ExchangeOutcome, anyhow::Error>
where
    F: FnMut(Stage, &UnsecureChannel) -> Result<(), anyhow::Error>,
{
    channel.broadcast(TAG_A, group.a().clone());
    channel.broadcast(TAG_B, group.b().clone());
    channel.broadcast(TAG_P, group.modulus().clone());
    channel.broadcast(TAG_GENERATOR, group.generator().clone());
    observe(Stage::Parameters, channel)?;

    channel.broadcast(TAG_GROUP, group.clone());
    observe(Stage::Group, channel)?;

    let alice_party = Participant::new(alice, group.clone()).commit(alpha)?;
    channel.note(alice, TAG_ALICE_PRIVATE, alice_party.private())?;
    let bob_party = Participant::new(bob, group.clone()).commit(beta)?;
    channel.note(bob, TAG_BOB_PRIVATE, bob_party.private())?;
    observe(Stage::Private, channel)?;

    let alice_public = alice_party.public().clone();
    channel.broadcast(TAG_ALICE_PUBLIC, alice_public.clone());
    let bob_public = bob_party.public().clone();
    channel.broadcast(TAG_BOB_PUBLIC, bob_public.clone());
    observe(Stage::Public, channel)?;

    let alice_party = alice_party.agree(&bob_public)?;
    channel.note(alice, TAG_SHARED_SECRET, alice_party.shared_secret().clone())?;
    let bob_party = bob_party.agree(&alice_public)?;
    channel.note(bob, TAG_SHARED_SECRET, bob_party.shared_secret().clone())?;
    observe(Stage::Secret, channel)?;

    Ok(ExchangeOutcome {
        alice_public,
        bob_public,
        alice_secret: alice_party.shared_secret().clone(),
        bob_secret: bob_party.shared_secret().clone(),
    })
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn stages_in_order() {
        let group = CurveGroup::from_u64(2, 2, 17, CurvePoint::from_u64(5, 1)).unwrap();
        let mut channel = UnsecureChannel::new();
        let alice = channel.register("Alice");
        let bob = channel.register("Bob");

        let mut stages = Vec::new();
        let outcome = run_exchange(&mut channel, &group, alice, bob, 9, 3, |stage, channel| {
            let trudy = channel.eavesdropper().knowledge();
            match stage {
                Stage::Parameters => assert_eq!(trudy.len(), 4),
                Stage::Group | Stage::Private => assert_eq!(trudy.len(), 5),
                Stage::Public | Stage::Secret => assert_eq!(trudy.len(), 7),
            }
            stages.push(stage);
            Ok(())
        })
        .unwrap();

        assert_eq!(
            stages,
            vec![
                Stage::Parameters,
                Stage::Group,
                Stage::Private,
                Stage::Public,
                Stage::Secret
            ]
        );
        assert!(outcome.agreed());
        assert_eq!(outcome.alice_secret, CurvePoint::from_u64(13, 7));
    }

    #[test]
    fn out_of_range_scalar_aborts() {
        let group = CurveGroup::from_u64(2, 2, 17, CurvePoint::from_u64(5, 1)).unwrap();
        let mut channel = UnsecureChannel::new();
        let alice = channel.register("Alice");
        let bob = channel.register("Bob");
        let result = run_exchange(&mut channel, &group, alice, bob, 9, 0, |_, _| Ok(()));
        assert!(result.is_err());
        assert!(!channel.eavesdropper().knowledge().contains(TAG_ALICE_PUBLIC));
    }

    #[test]
    fn observer_error_stops_the_run() {
        let group = CurveGroup::from_u64(2, 2, 17, CurvePoint::from_u64(5, 1)).unwrap();
        let mut channel = UnsecureChannel::new();
        let alice = channel.register("Alice");
        let bob = channel.register("Bob");
        let result = run_exchange(&mut channel, &group, alice, bob, 9, 3, |stage, _| {
            anyhow::ensure!(stage != Stage::Public, "stopped");
            Ok(())
        });
        assert!(result.is_err());
        assert!(!channel
            .agent(alice)
            .unwrap()
            .knowledge()
            .contains(TAG_SHARED_SECRET));
    }
}
