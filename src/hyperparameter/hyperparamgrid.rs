use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_pcg::Pcg64;
use std::collections::BTreeMap;

pub type Combination = BTreeMap<String, usize>;

/// Candidate values per hyperparameter name. Names are kept sorted so that combinations are
/// always enumerated in the same order.
pub struct HyperParamGrid {
    pub param_grid: BTreeMap<String, Vec<usize>>,
}

impl HyperParamGrid {
    /// Returns 'n' unique random combinations from all hyperparameter combinations or less
    /// depending on the amount of combinations possible. Assumes the values given for a
    /// parameter are unique.
    ///
    /// # Arguments
    ///
    /// * `n` - the requested amount of random results returned.
    /// * `seed` - seed of the shuffle, the same seed picks the same combinations.
    pub fn get_n_random_combinations(&self, n: usize, seed: u64) -> Vec<Combination> {
        let mut all_combinations = self.get_all_combinations();
        all_combinations.shuffle(&mut Pcg64::seed_from_u64(seed));
        all_combinations.into_iter().take(n).collect()
    }

    /// The whole grid when `num_iterations` is zero, otherwise that many random combinations.
    pub fn get_combinations(&self, num_iterations: usize, seed: u64) -> Vec<Combination> {
        if num_iterations == 0 {
            self.get_all_combinations()
        } else {
            self.get_n_random_combinations(num_iterations, seed)
        }
    }

    pub fn get_all_combinations(&self) -> Vec<Combination> {
        let keys = self.param_grid.keys().cloned().collect::<Vec<_>>();
        let values = self.param_grid.values().cloned().collect::<Vec<_>>();

        HyperParamGrid::cartesian_product(&values)
            .into_iter()
            .map(|param_values| keys.iter().cloned().zip(param_values).collect())
            .collect()
    }

    fn cartesian_product(lists: &[Vec<usize>]) -> Vec<Vec<usize>> {
        let mut list_iter = lists.iter();
        let mut res = match list_iter.next() {
            Some(first_list) => first_list.iter().map(|value| vec![*value]).collect::<Vec<_>>(),
            None => return Vec::new(),
        };
        for l in list_iter {
            let mut tmp = Vec::with_capacity(res.len() * l.len());
            for r in res {
                for &el in l {
                    let mut tmp_el = r.clone();
                    tmp_el.push(el);
                    tmp.push(tmp_el);
                }
            }
            res = tmp;
        }
        res
    }

    pub fn get_qty_combinations(&self) -> usize {
        if self.param_grid.is_empty() {
            return 0;
        }
        self.param_grid.values().map(|valid_values| valid_values.len()).product()
    }
}
