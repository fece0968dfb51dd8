use rand::Rng;

use crate::{
    DEAL_LIMIT, Deck, DeckUnderflowError, GameRules, Hand, NUM_PLAYERS, Observation, Policy,
    RulesError,
};

/// Final result of one game.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EpisodeOutcome {
    /// Cumulative score per seat.
    pub scores: [f32; NUM_PLAYERS],
    /// Rounds that ended in a deal.
    pub deals: usize,
}

impl EpisodeOutcome {
    /// Seat with the strictly higher score, or `None` on a tie.
    #[must_use]
    pub fn winner(&self) -> Option<usize> {
        let [a, b] = self.scores;
        if a > b {
            Some(0)
        } else if b > a {
            Some(1)
        } else {
            None
        }
    }

    /// Score of `seat` minus the opponent's score.
    #[must_use]
    pub fn score_diff(&self, seat: usize) -> f32 {
        self.scores[seat] - self.scores[1 - seat]
    }
}

/// Plays complete games under a fixed set of rules.
///
/// The deck and both hands live inside the table and are recycled between
/// episodes, so repeated play does not allocate.
///
/// # Game Flow
///
/// 1. Shuffle the deck and deal `hand_size` cards to each seat
/// 2. Each round the leader acts with no card showing, then the follower acts
///    seeing the leader's card
/// 3. If the two cards sum to at most [`DEAL_LIMIT`], both players score their
///    own card
/// 4. Each seat, in order, draws one card while the deck is not empty
/// 5. The lead alternates, seat 0 leading the first round
///
/// # Example
///
/// ```
/// use dollar_engine::{Action, FixedPolicy, GameRules, GameTable};
/// use rand::SeedableRng as _;
/// use rand_pcg::Pcg32;
///
/// let mut rng = Pcg32::seed_from_u64(3);
/// let mut table = GameTable::new(GameRules::default()).unwrap();
/// let mut a = FixedPolicy(Action::Median);
/// let mut b = FixedPolicy(Action::SmallSpoil);
///
/// let outcome = table.play_episode([&mut a, &mut b], &mut rng).unwrap();
/// assert!(outcome.deals <= table.num_rounds());
/// ```
#[derive(Debug, Clone)]
pub struct GameTable {
    rules: GameRules,
    num_rounds: usize,
    deck: Deck,
    hands: [Hand; NUM_PLAYERS],
}

impl GameTable {
    /// Creates a table after validating `rules`.
    pub fn new(rules: GameRules) -> Result<Self, RulesError> {
        rules.validate()?;
        let num_rounds = rules.num_rounds();
        let deck = Deck::new(&rules.deck);
        Ok(Self {
            rules,
            num_rounds,
            deck,
            hands: [Hand::new(), Hand::new()],
        })
    }

    #[must_use]
    pub fn rules(&self) -> &GameRules {
        &self.rules
    }

    #[must_use]
    pub fn num_rounds(&self) -> usize {
        self.num_rounds
    }

    /// Plays one full game; `players[i]` sits in seat `i`.
    ///
    /// Both players are [`reset`](Policy::reset) before the first round.
    pub fn play_episode<R>(
        &mut self,
        mut players: [&mut dyn Policy; NUM_PLAYERS],
        rng: &mut R,
    ) -> Result<EpisodeOutcome, DeckUnderflowError>
    where
        R: Rng + ?Sized,
    {
        self.deck.shuffle(rng);
        for hand in &mut self.hands {
            hand.clear();
            hand.pick_up_all(self.deck.deal(self.rules.hand_size)?);
        }
        for player in &mut players {
            player.reset();
        }

        let mut scores = [0.0; NUM_PLAYERS];
        let mut deals = 0;
        for round in 0..self.num_rounds {
            let leader = round % NUM_PLAYERS;
            let follower = 1 - leader;

            let lead = take_turn(
                &mut self.hands[leader],
                &mut *players[leader],
                None,
                deals,
                round + 1,
            );
            let follow = take_turn(
                &mut self.hands[follower],
                &mut *players[follower],
                Some(lead),
                deals,
                round + 1,
            );

            if lead + follow <= DEAL_LIMIT {
                scores[leader] += lead;
                scores[follower] += follow;
                deals += 1;
            }

            for hand in &mut self.hands {
                if let Some(card) = self.deck.draw() {
                    hand.pick_up(card);
                }
            }
        }

        Ok(EpisodeOutcome { scores, deals })
    }
}

fn take_turn(
    hand: &mut Hand,
    player: &mut dyn Policy,
    showing: Option<f32>,
    deals: usize,
    rounds_played: usize,
) -> f32 {
    let observation = Observation::from_hand(showing, hand, deals, rounds_played);
    let action = player.choose_action(&observation);
    hand.play(action, showing)
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;
    use crate::{Action, DeckComposition, FixedPolicy, Feature};

    /// Records every observation it receives and plays a fixed action.
    #[derive(Debug, Default)]
    struct Recorder {
        resets: usize,
        seen: Vec<Observation>,
    }

    impl Policy for Recorder {
        fn reset(&mut self) {
            self.resets += 1;
        }

        fn choose_action(&mut self, observation: &Observation) -> Action {
            self.seen.push(*observation);
            Action::Median
        }
    }

    #[test]
    fn test_every_round_is_played() {
        let mut rng = Pcg32::seed_from_u64(11);
        let mut table = GameTable::new(GameRules::default()).unwrap();
        let mut a = Recorder::default();
        let mut b = Recorder::default();
        table.play_episode([&mut a, &mut b], &mut rng).unwrap();

        assert_eq!(a.resets, 1);
        assert_eq!(b.resets, 1);
        assert_eq!(a.seen.len(), 26);
        assert_eq!(b.seen.len(), 26);
        // The deck is exhausted exactly when the last round is played.
        assert!(table.deck.is_empty());
        assert!(table.hands.iter().all(|h| h.len() == 4));
    }

    #[test]
    fn test_lead_alternates() {
        let mut rng = Pcg32::seed_from_u64(5);
        let mut table = GameTable::new(GameRules::default()).unwrap();
        let mut a = Recorder::default();
        let mut b = Recorder::default();
        table.play_episode([&mut a, &mut b], &mut rng).unwrap();

        for (round, (oa, ob)) in a.seen.iter().zip(&b.seen).enumerate() {
            let a_second = round % 2 == 1;
            assert_eq!(oa[Feature::SecondToAct], if a_second { 1.0 } else { 0.0 });
            assert_eq!(ob[Feature::SecondToAct], if a_second { 0.0 } else { 1.0 });
            if a_second {
                assert!(oa[Feature::CardShowing] > 0.0);
                assert_eq!(ob[Feature::CardShowing], 0.0);
            }
        }
    }

    #[test]
    fn test_single_value_deck_always_deals() {
        // Two 0.5 cards always sum to exactly 1.0, so every round is a deal.
        let rules = GameRules {
            deck: DeckComposition::new([(0.5, 20)]),
            hand_size: 3,
        };
        let mut rng = Pcg32::seed_from_u64(0);
        let mut table = GameTable::new(rules).unwrap();
        let mut a = FixedPolicy(Action::LargeMax);
        let mut b = FixedPolicy(Action::SmallSpoil);
        let outcome = table.play_episode([&mut a, &mut b], &mut rng).unwrap();

        assert_eq!(table.num_rounds(), 8);
        assert_eq!(outcome.deals, 8);
        assert_eq!(outcome.scores, [4.0, 4.0]);
        assert_eq!(outcome.winner(), None);
        assert_eq!(outcome.score_diff(0), 0.0);
    }

    #[test]
    fn test_deal_ratio_counts_current_round() {
        let rules = GameRules {
            deck: DeckComposition::new([(0.5, 20)]),
            hand_size: 3,
        };
        let mut rng = Pcg32::seed_from_u64(0);
        let mut table = GameTable::new(rules).unwrap();
        let mut a = Recorder::default();
        let mut b = FixedPolicy(Action::Median);
        table.play_episode([&mut a, &mut b], &mut rng).unwrap();

        // Round 0: no deals yet. Every later round follows an all-deal history.
        assert_eq!(a.seen[0][Feature::DealRatio], 0.0);
        assert_eq!(a.seen[1][Feature::DealRatio], 0.5);
        assert_eq!(a.seen[3][Feature::DealRatio], 0.75);
    }

    #[test]
    fn test_scores_only_come_from_deals() {
        let rules = GameRules {
            deck: DeckComposition::new([(0.25, 10), (0.75, 10)]),
            hand_size: 3,
        };
        let mut rng = Pcg32::seed_from_u64(9);
        let mut table = GameTable::new(rules).unwrap();
        let mut a = FixedPolicy(Action::LargeMax);
        let mut b = FixedPolicy(Action::SmallSpoil);
        let outcome = table.play_episode([&mut a, &mut b], &mut rng).unwrap();

        assert!(outcome.deals <= table.num_rounds());
        let total: f32 = outcome.scores.iter().sum();
        assert!(total <= DEAL_LIMIT * outcome.deals as f32);
    }

    #[test]
    fn test_outcome_winner() {
        let outcome = EpisodeOutcome {
            scores: [3.0, 2.5],
            deals: 7,
        };
        assert_eq!(outcome.winner(), Some(0));
        assert_eq!(outcome.score_diff(0), 0.5);
        assert_eq!(outcome.score_diff(1), -0.5);

        let outcome = EpisodeOutcome {
            scores: [1.0, 2.5],
            deals: 5,
        };
        assert_eq!(outcome.winner(), Some(1));
    }
}
