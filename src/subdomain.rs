use log::debug;
use crate::config::ProblemConfig;
use crate::error::Error;
use crate::exchange::{self, Exchange, Status};
use crate::field::Field;
use crate::grid::{Grid, GridView};
use crate::index_space::IndexSpace;
use crate::meshing;
use crate::residual::ResidualAssembler;




/// A block of guard zone values sent between subdomains, and the offset
/// along the periodic axis at which the recipient stores it.
///
pub struct Strip {
    data: Field,
    offset: i64,
}




/// A subdomain of a decomposed grid, which exchanges guard zones with its
/// peers and then assembles the residual on its owned cells.
///
pub struct Subdomain {
    index: usize,
    view: GridView,
    config: ProblemConfig,
    field: Field,
    outgoing: Vec<(usize, IndexSpace, i64)>,
    incoming_count: usize,
    received_count: usize,
}




// ============================================================================
impl Subdomain {

    /// Create the subdomain owning `blocks[index]`, with its owned values
    /// taken from the global field. The halo width is the stencil reach of
    /// the configured limiter. Guard zones are zero until the exchange has
    /// run.
    ///
    pub fn new(index: usize, blocks: &[IndexSpace], grid: Grid, config: ProblemConfig, global: &Field) -> Result<Self, Error> {
        let halo = config.stencil_reach();
        let view = GridView::new(grid, blocks[index].clone(), halo)?;
        let mut field = Field::zeros(view.ghosted());
        field.insert(&global.extract(view.owned().clone()), (0, 0, 0));

        let mut outgoing = Vec::new();
        let mut incoming_count = 0;

        for (peer, block) in blocks.iter().enumerate() {
            let peer_ghosted = block.extend_all(halo);

            for (region, offset) in meshing::periodic_images(&grid, view.owned(), &peer_ghosted) {
                if !(peer == index && offset == 0) {
                    outgoing.push((peer, region, offset))
                }
            }
            incoming_count += meshing::periodic_images(&grid, block, &view.ghosted())
                .into_iter()
                .filter(|(_, offset)| !(peer == index && *offset == 0))
                .count();
        }

        Ok(Self {
            index,
            view,
            config,
            field,
            outgoing,
            incoming_count,
            received_count: 0,
        })
    }
}




// ============================================================================
impl Exchange for Subdomain {
    type Key = usize;
    type Message = Strip;
    type Value = Result<Field, Error>;

    fn key(&self) -> Self::Key {
        self.index
    }

    fn messages(&self) -> Vec<(Self::Key, Self::Message)> {
        self.outgoing
            .iter()
            .map(|(peer, region, offset)| {
                let data = self.field.extract(region.clone());
                (*peer, Strip { data, offset: *offset })
            })
            .collect()
    }

    fn receive(&mut self, strip: Self::Message) {
        self.field.insert(&strip.data, (0, 0, strip.offset));
        self.received_count += 1;
    }

    fn status(&self) -> Status {
        Status::eligible_if(self.received_count == self.incoming_count)
    }

    fn value(self) -> Self::Value {
        debug!(
            "subdomain {} received {} guard strips for a halo of width {}",
            self.index,
            self.received_count,
            self.view.halo());

        let problem = self.config.problem();
        let assembler = ResidualAssembler::new(&self.view, &self.config, &problem)?;
        Ok(assembler.assemble(&self.field))
    }
}




/// Assemble the residual of a global field on a decomposed grid. The
/// subdomains exchange guard zones and evaluate their residuals in serial, or
/// on the given Rayon pool when it has at least two threads. The local
/// residuals are gathered into a field covering the whole grid.
///
pub fn global_residual(
    grid: Grid,
    config: ProblemConfig,
    global: &Field,
    blocks: &[IndexSpace],
    pool: Option<&rayon::ThreadPool>,
) -> Result<Field, Error> {
    let tasks = (0..blocks.len())
        .map(|index| Subdomain::new(index, blocks, grid, config, global))
        .collect::<Result<Vec<_>, _>>()?;

    let mut residual = Field::zeros(grid.index_space());

    match pool {
        Some(pool) if pool.current_num_threads() >= 2 => {
            pool.scope(|scope| {
                for local in exchange::execute_par(scope, tasks) {
                    residual.insert(&local?, (0, 0, 0))
                }
                Ok::<(), Error>(())
            })?
        }
        _ => {
            for local in exchange::execute(tasks) {
                residual.insert(&local?, (0, 0, 0))
            }
        }
    }
    Ok(residual)
}
