use crate::{
    cube::Color,
    method::{DepthConfig, Method},
    solution::Solution,
};
use fxhash::FxHashSet;

/// Which ranked solutions to show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayFilter {
    pub methods: FxHashSet<Method>,
    pub colors: FxHashSet<Color>,
    /// Per group depth bound, and the number of alg variants per case under
    /// `alg`.
    pub depths: DepthConfig,
    pub limit: usize,
}

impl Default for DisplayFilter {
    fn default() -> Self {
        Self {
            methods: Method::ALL
                .into_iter()
                .filter(|method| method.enabled_by_default())
                .collect(),
            colors: Color::ALL.into_iter().collect(),
            depths: DepthConfig::default(),
            limit: 50,
        }
    }
}

impl DisplayFilter {
    #[must_use]
    pub fn accepts(&self, solution: &Solution) -> bool {
        self.methods.contains(&solution.method)
            && self.colors.contains(&solution.color)
            && usize::from(self.depths[solution.method_group]) >= solution.depth
            && usize::from(self.depths.alg) > solution.alg_number
    }

    /// The first `limit` accepted solutions of a ranked batch, in order.
    pub fn apply<'a>(&'a self, ranked: &'a [Solution]) -> impl Iterator<Item = &'a Solution> {
        ranked
            .iter()
            .filter(|solution| self.accepts(solution))
            .take(self.limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{method::MethodGroup, moves::Alg};

    fn solution(method: Method, color: Color, depth: usize, alg_number: usize) -> Solution {
        let inspection = Alg::new(vec!["R".parse().unwrap(); depth]);
        Solution {
            method,
            method_group: method.group(),
            subset: "H".to_owned(),
            color,
            face: String::new(),
            inspection,
            pre_auf: None,
            alg: "R2 F2 R2".parse().unwrap(),
            post_auf: None,
            depth,
            alg_number,
            score: depth + 3,
            face_score: 0,
            should_delete: false,
        }
    }

    #[test]
    fn test_default_filter() {
        let filter = DisplayFilter::default();
        assert!(filter.accepts(&solution(Method::Eg2, Color::Blue, 5, 0)));
        assert!(!filter.accepts(&solution(Method::Eg2, Color::Blue, 6, 0)));
        assert!(!filter.accepts(&solution(Method::Eg2, Color::Blue, 0, 1)));
        assert!(!filter.accepts(&solution(Method::TcllPlus, Color::Blue, 0, 0)));
    }

    #[test]
    fn test_selection_and_limit() {
        let mut filter = DisplayFilter {
            methods: Method::ALL.into_iter().collect(),
            colors: [Color::White].into_iter().collect(),
            depths: DepthConfig {
                alg: 2,
                ..DepthConfig::uniform(1)
            },
            limit: 2,
        };
        let ranked = [
            solution(Method::Ls3, Color::White, 1, 1),
            solution(Method::Cll, Color::Yellow, 0, 0),
            solution(Method::TcllMinus, Color::White, 2, 0),
            solution(Method::Leg1, Color::White, 0, 0),
            solution(Method::Cll, Color::White, 0, 0),
        ];
        let shown = filter.apply(&ranked).map(|s| s.method).collect::<Vec<_>>();
        assert_eq!(shown, [Method::Ls3, Method::Leg1]);
        assert_eq!(ranked[0].method_group, MethodGroup::Ls);

        filter.limit = 50;
        assert_eq!(filter.apply(&ranked).count(), 3);
    }
}
