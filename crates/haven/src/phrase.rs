use std::sync::LazyLock;

use rand::Rng;
use rand::seq::index;

/// Recovery word pool: 256 common, visually distinct English words.
const WORD_LIST: &str = "\
    acid amber anchor apple arrow aspen atlas autumn badge bamboo barrel basin beacon berry birch bloom \
    bolt border bounce brave breeze brick bridge bronze brush butter cabin cactus camera canal candle canyon \
    carbon cargo carpet castle cedar chalk charm cherry chess chill cider cinder circle citrus clay cliff \
    clover coast cobalt coconut comet copper coral cotton crane crater crystal current dawn delta denim desert \
    diesel dome drift dune dusk eagle early ebony echo ember engine envoy estate fable falcon feather \
    fern fiber field finch fjord flame flint flora fog forest forge fossil fountain fox frost galaxy \
    garden garnet geyser ginger glacier glade globe grain granite grape gravel grove hail harbor hazel heron \
    hickory hill hollow honey horizon humble igloo indigo iris iron island ivory jade jasper jungle juniper \
    kayak kernel kettle lagoon lake lantern larch laurel lava lemon lilac lily linen lunar lyric magnet \
    mango maple marble marsh meadow mellow mesa meteor mint mirror mist molten monsoon morning moss mountain \
    mulberry mural nectar nickel night nimble north nova oak oasis ocean olive onyx opal orbit orchard \
    osprey otter oxide oyster palm paper parcel pastel patio peach pearl pebble pecan penguin pepper petal \
    pigeon pine pigment pilot plaza plume polar pond poppy prairie prism pulse pumpkin quarry quartz quill \
    raven reef ridge river robin rocket rose ruby rustic saddle saffron sage salmon sand sapphire sequoia \
    shadow shell silver sketch slate smoke snow solar sonnet spark spruce squall stone storm summit sunset \
    tempo thunder tiger timber topaz trail tulip tundra turquoise umber valley velvet violet walnut willow zephyr";

static WORDS: LazyLock<Vec<&'static str>> = LazyLock::new(|| WORD_LIST.split_whitespace().collect());

/// Size of the word pool phrases are drawn from.
#[must_use]
pub fn pool_size() -> usize {
    WORDS.len()
}

/// Draw a recovery phrase of `word_count` distinct words.
pub fn generate_phrase<R: Rng>(rng: &mut R, word_count: usize) -> Vec<String> {
    let pool = &*WORDS;
    let take = word_count.clamp(1, pool.len());
    index::sample(rng, pool.len(), take)
        .into_iter()
        .map(|i| pool[i].to_string())
        .collect()
}

/// Pick `challenge_size` distinct positions of the phrase the user must
/// re-select, in ascending order.
pub fn verification_challenge<R: Rng>(
    rng: &mut R,
    phrase_len: usize,
    challenge_size: usize,
) -> Vec<usize> {
    if phrase_len == 0 {
        return Vec::new();
    }
    let take = challenge_size.clamp(1, phrase_len);
    let mut positions: Vec<usize> = index::sample(rng, phrase_len, take).into_iter().collect();
    positions.sort_unstable();
    positions
}

/// True when the selection covers exactly the challenged positions,
/// regardless of selection order.
#[must_use]
pub fn selection_matches(challenge: &[usize], selected: &[usize]) -> bool {
    if challenge.len() != selected.len() {
        return false;
    }
    let mut lhs = challenge.to_vec();
    let mut rhs = selected.to_vec();
    lhs.sort_unstable();
    rhs.sort_unstable();
    lhs == rhs
}
