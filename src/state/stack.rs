/// Image stack assembly
///
/// A stack is the base image plus every neighbor along one chosen sweep
/// parameter, ordered by that parameter's value. The viewer scrubs through
/// the slices with a slider, which is what makes a parameter sweep readable
/// as an animation.
use crate::error::SeekerResult;
use crate::state::data::ToothRow;

/// One slice of a stack: a catalogued screenshot and its axis value.
#[derive(Debug, Clone, PartialEq)]
pub struct StackSlice {
    pub row_id: i64,
    pub path: String,
    pub value: f64,
}

/// The assembled stack for one base row and axis parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageStack {
    /// The sweep parameter the stack is sliced along
    pub axis: String,
    /// Slices sorted ascending by axis value; always contains the base row
    pub slices: Vec<StackSlice>,
    /// Position of the base row within `slices`
    pub base_index: usize,
}

impl ImageStack {
    /// Order the base row and its neighbors by axis value.
    ///
    /// Neighbors all differ from the base in the axis column, so values are
    /// distinct in practice; ties fall back to id order to stay
    /// deterministic.
    pub fn assemble(
        base: &ToothRow,
        neighbors: &[ToothRow],
        axis: &str,
    ) -> SeekerResult<Self> {
        let mut slices = Vec::with_capacity(neighbors.len() + 1);
        for row in std::iter::once(base).chain(neighbors) {
            slices.push(StackSlice {
                row_id: row.id,
                path: row.path.clone(),
                value: row.sweep_value(axis)?,
            });
        }
        slices.sort_by(|a, b| {
            a.value
                .total_cmp(&b.value)
                .then_with(|| a.row_id.cmp(&b.row_id))
        });

        let base_index = slices
            .iter()
            .position(|slice| slice.row_id == base.id)
            .unwrap_or(0);

        Ok(ImageStack {
            axis: axis.to_string(),
            slices,
            base_index,
        })
    }

    pub fn len(&self) -> usize {
        self.slices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slices.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::data::test_support::sample_params;

    fn row(id: i64, path: &str, inh: f64) -> ToothRow {
        let mut params = sample_params();
        params.inh = inh;
        ToothRow {
            id,
            path: path.to_string(),
            params,
            faulty: false,
        }
    }

    #[test]
    fn test_slices_sorted_by_axis_value() {
        let base = row(10, "base.png", 25.0);
        let neighbors = vec![row(11, "high.png", 100.0), row(12, "low.png", 5.0)];

        let stack = ImageStack::assemble(&base, &neighbors, "Inh").unwrap();

        let values: Vec<f64> = stack.slices.iter().map(|slice| slice.value).collect();
        assert_eq!(values, vec![5.0, 25.0, 100.0]);
        assert_eq!(stack.base_index, 1);
        assert_eq!(stack.slices[stack.base_index].row_id, 10);
    }

    #[test]
    fn test_stack_of_base_alone() {
        let base = row(1, "base.png", 25.0);
        let stack = ImageStack::assemble(&base, &[], "Inh").unwrap();
        assert_eq!(stack.len(), 1);
        assert_eq!(stack.base_index, 0);
    }

    #[test]
    fn test_integer_axis_sorts_numerically() {
        let base = row(1, "base.png", 25.0);
        let mut fast = row(2, "fast.png", 25.0);
        fast.params.iter = 900;
        let mut slow = row(3, "slow.png", 25.0);
        slow.params.iter = 14000;

        let stack = ImageStack::assemble(&base, &[slow, fast], "iter").unwrap();
        let ids: Vec<i64> = stack.slices.iter().map(|slice| slice.row_id).collect();
        // 900 < 9000 < 14000: numeric, not lexicographic
        assert_eq!(ids, vec![2, 1, 3]);
    }

    #[test]
    fn test_unknown_axis_is_an_error() {
        let base = row(1, "base.png", 25.0);
        assert!(ImageStack::assemble(&base, &[], "model").is_err());
    }
}
