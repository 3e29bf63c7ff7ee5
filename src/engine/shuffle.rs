use rand::Rng;

/// Result of shuffling a question's answer options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShuffledOptions {
    pub options: Vec<String>,
    pub correct_indices: Vec<usize>,
}

/// Shuffle `options` into a uniformly random order and recompute where the
/// correct answers ended up. The inputs are left untouched.
pub fn shuffle_options<R: Rng + ?Sized>(
    options: &[String],
    correct_indices: &[usize],
    rng: &mut R,
) -> ShuffledOptions {
    shuffle_options_with(options, correct_indices, |upper| rng.gen_range(0..=upper))
}

/// Same as [`shuffle_options`], but with the index source injected: `pick`
/// receives an upper bound and must return a value in `0..=upper`. Lets
/// tests script an exact permutation.
///
/// Correctness follows the option *text* through the permutation, so if two
/// options share the same text and only one of them is correct, both come
/// out marked correct. Tracking original indices instead would change
/// scored outcomes for existing question banks.
pub fn shuffle_options_with<F: FnMut(usize) -> usize>(
    options: &[String],
    correct_indices: &[usize],
    mut pick: F,
) -> ShuffledOptions {
    let correct_texts: Vec<&String> = correct_indices
        .iter()
        .filter_map(|&i| options.get(i))
        .collect();

    let mut shuffled = options.to_vec();
    for i in (1..shuffled.len()).rev() {
        let j = pick(i);
        shuffled.swap(i, j);
    }

    let mut remapped: Vec<usize> = shuffled
        .iter()
        .enumerate()
        .filter(|(_, opt)| correct_texts.iter().any(|t| *t == *opt))
        .map(|(i, _)| i)
        .collect();
    remapped.sort_unstable();

    ShuffledOptions {
        options: shuffled,
        correct_indices: remapped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn opts(texts: &[&str]) -> Vec<String> {
        texts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn scripted_permutation_remaps_correct_index() {
        // Picks 2, 0, 1 for i = 3, 2, 1 turn [A,B,C,D] into [D,B,A,C].
        let mut picks = [2usize, 0, 1].into_iter();
        let result = shuffle_options_with(&opts(&["A", "B", "C", "D"]), &[1], |_| {
            picks.next().expect("script exhausted")
        });

        assert_eq!(result.options, opts(&["D", "B", "A", "C"]));
        assert_eq!(result.correct_indices, vec![1]);
    }

    #[test]
    fn output_is_a_permutation_of_input() {
        let input = opts(&["eins", "zwei", "drei", "vier", "fünf"]);
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let result = shuffle_options(&input, &[0, 3], &mut rng);
            let mut got = result.options.clone();
            let mut want = input.clone();
            got.sort();
            want.sort();
            assert_eq!(got, want);
        }
    }

    #[test]
    fn correct_texts_survive_the_shuffle() {
        let input = opts(&["rot", "grün", "blau", "gelb"]);
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..50 {
            let result = shuffle_options(&input, &[1, 2], &mut rng);
            let mut texts: Vec<&String> = result
                .correct_indices
                .iter()
                .map(|&i| &result.options[i])
                .collect();
            texts.sort();
            assert_eq!(texts, vec!["blau", "grün"]);
        }
    }

    #[test]
    fn inputs_are_not_mutated() {
        let input = opts(&["a", "b", "c"]);
        let correct = vec![2];
        let mut rng = StdRng::seed_from_u64(1);
        let _ = shuffle_options(&input, &correct, &mut rng);
        assert_eq!(input, opts(&["a", "b", "c"]));
        assert_eq!(correct, vec![2]);
    }

    #[test]
    fn duplicate_texts_all_become_correct() {
        // Known remap behavior: textual duplicates of a correct option are
        // indistinguishable after the shuffle.
        let result = shuffle_options_with(&opts(&["ja", "nein", "ja"]), &[0], |upper| upper);
        assert_eq!(result.correct_indices.len(), 2);
    }

    #[test]
    fn single_option_is_untouched() {
        let result = shuffle_options_with(&opts(&["einzig"]), &[0], |_| {
            unreachable!("nothing to swap")
        });
        assert_eq!(result.options, opts(&["einzig"]));
        assert_eq!(result.correct_indices, vec![0]);
    }
}
