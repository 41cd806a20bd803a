/*
 * Copyright (C) Oscar Shrimpton 2020
 *
 * This program is free software: you can redistribute it and/or modify it
 * under the terms of the GNU General Public License as published by the Free
 * Software Foundation, either version 3 of the License, or (at your option)
 * any later version.
 *
 * This program is distributed in the hope that it will be useful, but WITHOUT
 * ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or
 * FITNESS FOR A PARTICULAR PURPOSE.  See the GNU General Public License for
 * more details.
 *
 * You should have received a copy of the GNU General Public License along
 * with this program.  If not, see <http://www.gnu.org/licenses/>.
 */

//! Permutations and combinations of index lists.
//!
//! Duplicate items are treated as distinct: `[1, 1]` has two 1-permutations.
//! Callers who need unique results should pass unique items.

/// Every ordered selection of `size` items.
pub fn permutations(items: &[usize], size: usize) -> Vec<Vec<usize>> {
    if size == 0 {
        return vec![vec![]];
    }
    if size > items.len() {
        return vec![];
    }

    let mut output = Vec::new();
    for (i, item) in items.iter().enumerate() {
        // Only this position is removed, so an equal item elsewhere stays available.
        let mut others = items.to_vec();
        others.remove(i);

        for mut rest in permutations(&others, size - 1) {
            rest.insert(0, *item);
            output.push(rest);
        }
    }

    output
}

/// Every unordered selection of `size` items, in lexicographic order of position.
pub fn combinations(items: &[usize], size: usize) -> Vec<Vec<usize>> {
    let mut output = Vec::new();
    let mut current = Vec::with_capacity(size);
    combine(items, size, 0, &mut current, &mut output);

    output
}

fn combine(items: &[usize], size: usize, start: usize, current: &mut Vec<usize>, output: &mut Vec<Vec<usize>>) {
    if current.len() == size {
        output.push(current.clone());
        return;
    }

    let needed = size - current.len();
    if items.len() < needed {
        return;
    }

    for i in start..=items.len() - needed {
        current.push(items[i]);
        combine(items, size, i + 1, current, output);
        current.pop();
    }
}

/// `0..count` as a list, the usual input for the functions above.
pub fn indices(count: usize) -> Vec<usize> {
    (0..count).collect()
}
