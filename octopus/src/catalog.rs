use std::collections::BTreeMap;

use crate::{
    ast_printer::ast_to_string,
    stmt::{Program, ResourceBlock, Stmt},
};

/// Resources declared by a program, in source order.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Catalog {
    items: Vec<Item>,
}

/// One resource and its settings.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub resource: String,
    pub title: String,
    pub class: String,
    pub attributes: BTreeMap<String, String>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_resource(&mut self, item: Item) {
        self.items.push(item);
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Collects every resource block reachable from each class body,
    /// including those nested in other resources or conditional blocks.
    pub fn from_program(program: &Program) -> Self {
        let mut catalog = Self::new();
        for class in &program.classes {
            catalog.collect(&class.name, &class.body);
        }
        catalog
    }

    fn collect(&mut self, class: &str, body: &[Stmt]) {
        for stmt in body {
            match stmt {
                Stmt::Resource(resource) => {
                    self.add_resource(Item::new(class, resource));
                    self.collect(class, &resource.body);
                }
                Stmt::If {
                    branches,
                    else_branch,
                } => {
                    for branch in branches {
                        self.collect(class, &branch.body);
                    }
                    if let Some(body) = else_branch {
                        self.collect(class, body);
                    }
                }
                Stmt::For { body, .. } => self.collect(class, body),
                Stmt::Switch { cases, default, .. } => {
                    for case in cases {
                        self.collect(class, &case.body);
                    }
                    if let Some(body) = default {
                        self.collect(class, body);
                    }
                }
                Stmt::Attribute { .. } | Stmt::Expression(_) => {}
            }
        }
    }
}

impl Item {
    fn new(class: &str, resource: &ResourceBlock) -> Self {
        let attributes = resource
            .body
            .iter()
            .filter_map(|stmt| match stmt {
                Stmt::Attribute { name, value, .. } => {
                    Some((name.clone(), ast_to_string(value).into_owned()))
                }
                _ => None,
            })
            .collect();

        Self {
            resource: resource.kind.clone(),
            title: ast_to_string(&resource.title).into_owned(),
            class: class.to_owned(),
            attributes,
        }
    }
}

impl std::fmt::Display for Item {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}[{}] {}", self.resource, self.title, self.class)?;
        for (name, value) in &self.attributes {
            write!(f, " {name}={value}")?;
        }
        Ok(())
    }
}
