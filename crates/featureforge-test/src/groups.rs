//! Minimal models, one group kind each.

use featureforge_core::{CounterIdentifierFactory, FeatureModel, Group, Identifier, Range, Result};

/// A root plus its children, all in group 0 of the root.
#[derive(Debug, Clone)]
pub struct GroupModel {
    pub model: FeatureModel,
    pub root: Identifier,
    pub children: Vec<Identifier>,
}

/// An empty model numbering its elements from 1.
pub fn fresh_model() -> FeatureModel {
    FeatureModel::with_factory(Box::new(CounterIdentifierFactory::starting_at(1)))
}

fn grouped(group: Group, names: &[&str]) -> Result<GroupModel> {
    let mut model = fresh_model();
    let root = model.add_feature("Root")?;
    model.set_group_range(&root, 0, group.range())?;
    let children = names
        .iter()
        .map(|name| model.add_child(name, &root))
        .collect::<Result<Vec<_>>>()?;
    Ok(GroupModel {
        model,
        root,
        children,
    })
}

/// `Root` with an OR group over `names`.
pub fn or_model(names: &[&str]) -> GroupModel {
    grouped(Group::or(), names).expect("or fixture is well-formed")
}

/// `Root` with an ALTERNATIVE group over `names`.
pub fn alternative_model(names: &[&str]) -> GroupModel {
    grouped(Group::alternative(), names).expect("alternative fixture is well-formed")
}

/// `Root` with a `[lower..upper]` group over `names`.
pub fn cardinality_model(lower: usize, upper: Option<usize>, names: &[&str]) -> GroupModel {
    Range::new(lower, upper)
        .and_then(|range| grouped(Group::new(range), names))
        .expect("cardinality fixture needs lower <= upper")
}

/// `R` with the single child `A`, which has an OR group over `B` and `C`.
///
/// Returns the model and the identifiers of `R`, `A`, `B`, `C`.
pub fn single_child_chain() -> (FeatureModel, [Identifier; 4]) {
    let build = || -> Result<_> {
        let mut model = fresh_model();
        let r = model.add_feature("R")?;
        let a = model.add_child("A", &r)?;
        model.set_or(&a)?;
        let b = model.add_child("B", &a)?;
        let c = model.add_child("C", &a)?;
        Ok((model, [r, a, b, c]))
    };
    build().expect("chain fixture is well-formed")
}
