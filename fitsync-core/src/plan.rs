//! Kiểm tra catalog và sắp thứ tự phân giải theo phụ thuộc.

use std::collections::HashMap;

use crate::error::CatalogError;
use crate::model::{Catalog, FieldSpec};

/// Catalog đã được kiểm tra, kèm thứ tự topo và các tầng phụ thuộc.
///
/// Trong cùng một tầng không trường nào phụ thuộc trường khác, nên có thể
/// phân giải song song.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolutionPlan {
    catalog: Catalog,
    order: Vec<usize>,
    levels: Vec<Vec<usize>>,
}

impl ResolutionPlan {
    pub fn new(catalog: Catalog) -> Result<Self, CatalogError> {
        let index = index_fields(&catalog)?;
        let dependencies = catalog
            .iter()
            .map(|field| dependencies_of(field, &index))
            .collect::<Result<Vec<_>, _>>()?;

        let order = topological_order(&catalog, &dependencies)?;

        let mut depth = vec![0usize; catalog.len()];
        for &position in &order {
            depth[position] = dependencies[position]
                .iter()
                .map(|&dependency| depth[dependency] + 1)
                .max()
                .unwrap_or(0);
        }
        let level_count = depth.iter().max().map_or(0, |deepest| deepest + 1);
        let mut levels = vec![Vec::new(); level_count];
        for &position in &order {
            levels[depth[position]].push(position);
        }

        Ok(Self {
            catalog,
            order,
            levels,
        })
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Các trường theo thứ tự phân giải.
    pub fn ordered_fields(&self) -> impl Iterator<Item = &FieldSpec> {
        self.order.iter().map(|&position| &self.catalog.fields[position])
    }

    pub fn levels(&self) -> impl Iterator<Item = Vec<&FieldSpec>> {
        self.levels.iter().map(|level| {
            level
                .iter()
                .map(|&position| &self.catalog.fields[position])
                .collect()
        })
    }
}

fn index_fields(catalog: &Catalog) -> Result<HashMap<&str, usize>, CatalogError> {
    let mut index = HashMap::with_capacity(catalog.len());
    for (position, field) in catalog.iter().enumerate() {
        if field.candidates.is_empty() && field.derivation.is_none() {
            return Err(CatalogError::EmptyField(field.name.clone()));
        }
        if let Some(candidate) = field.candidates.iter().find(|c| c.path.is_empty()) {
            return Err(CatalogError::EmptyPath {
                field: field.name.clone(),
                source_name: candidate.source.clone(),
            });
        }
        if index.insert(field.name.as_str(), position).is_some() {
            return Err(CatalogError::DuplicateField(field.name.clone()));
        }
    }
    Ok(index)
}

fn dependencies_of(
    field: &FieldSpec,
    index: &HashMap<&str, usize>,
) -> Result<Vec<usize>, CatalogError> {
    let Some(derivation) = &field.derivation else {
        return Ok(Vec::new());
    };

    let mut dependencies = Vec::new();
    for input in derivation.inputs() {
        if input == field.name {
            return Err(CatalogError::SelfDependency(field.name.clone()));
        }
        let Some(&position) = index.get(input) else {
            return Err(CatalogError::UnknownDependency {
                field: field.name.clone(),
                dependency: input.to_string(),
            });
        };
        if !dependencies.contains(&position) {
            dependencies.push(position);
        }
    }
    Ok(dependencies)
}

/// Kahn ổn định: khi nhiều trường cùng sẵn sàng, giữ thứ tự khai báo.
fn topological_order(
    catalog: &Catalog,
    dependencies: &[Vec<usize>],
) -> Result<Vec<usize>, CatalogError> {
    let mut done = vec![false; catalog.len()];
    let mut order = Vec::with_capacity(catalog.len());

    while order.len() < catalog.len() {
        let next = (0..catalog.len()).find(|&position| {
            !done[position] && dependencies[position].iter().all(|&dep| done[dep])
        });
        match next {
            Some(position) => {
                done[position] = true;
                order.push(position);
            }
            None => {
                let cycle = find_cycle(catalog, dependencies, &done);
                return Err(CatalogError::CircularDependency(cycle));
            }
        }
    }

    Ok(order)
}

/// Mọi trường còn lại đều có phụ thuộc chưa xong, nên đi theo phụ thuộc đầu
/// tiên chưa xong sẽ quay lại một trường đã gặp.
fn find_cycle(catalog: &Catalog, dependencies: &[Vec<usize>], done: &[bool]) -> Vec<String> {
    let Some(start) = (0..catalog.len()).find(|&position| !done[position]) else {
        return Vec::new();
    };

    let mut path = vec![start];
    let mut current = start;
    loop {
        let Some(&next) = dependencies[current].iter().find(|&&dep| !done[dep]) else {
            return Vec::new();
        };
        if let Some(seen) = path.iter().position(|&position| position == next) {
            let mut cycle: Vec<String> = path[seen..]
                .iter()
                .map(|&position| catalog.fields[position].name.clone())
                .collect();
            cycle.push(catalog.fields[next].name.clone());
            return cycle;
        }
        path.push(next);
        current = next;
    }
}
