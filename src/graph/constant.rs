use crate::{
    engine::backend::Backend,
    error::Result,
    graph::{
        node::{Control, Unit, UnitId, UnitKind},
        param::{Param, VALUE},
    },
    synth::Synth,
};

impl<B: Backend> Synth<B> {
    /// A steady signal. The level is the `"value"` parameter, so it can be
    /// ramped, scheduled or driven by other units.
    pub fn constant(&mut self, value: impl Into<Control>) -> Result<UnitId> {
        let value = value.into();
        let (node, offset) = self.constant_node(value.value_or(0.0))?;

        let mut unit = Unit::new(UnitKind::Constant, node);
        unit.add_param(Param::value(VALUE, offset));

        let id = self.add_unit(unit);
        tracing::debug!("Created constant {}", id);
        self.init_param(id, VALUE, value)?;
        Ok(id)
    }
}
