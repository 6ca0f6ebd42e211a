//! Circular rigid bodies bouncing elastically inside a bounded 2D arena.
//!
//! The physics lives in [`core`]; with the `python` feature enabled this crate also
//! builds a `ballpit` extension module whose `BallPit` class is the handle a
//! rendering loop drives between frames.

pub mod core;
pub mod error;

pub use crate::core::{Particle, World, WorldConfig};

#[cfg(feature = "python")]
mod python {
    use numpy::ndarray::{Array1, Array2};
    use numpy::{IntoPyArray, PyArray1, PyArray2};
    use pyo3::exceptions::PyValueError;
    use pyo3::prelude::*;

    use crate::core::vecmath::DIM;
    use crate::core::{WallRule, World, WorldConfig};

    fn py_err<E: ToString>(e: E) -> PyErr {
        PyValueError::new_err(e.to_string())
    }

    /// Python-facing wrapper around [`World`].
    ///
    /// API:
    /// - __new__(width, height, restitution=(1.0, 1.0), wall_rule="symmetric", seed=None)
    /// - populate(count, radius), spawn(...), spawn_at(x, y), reset(), resize(w, h)
    /// - step(ticks=1)
    /// - get_positions() / get_velocities() -> np.ndarray, shape (N, 2)
    /// - get_radii() -> np.ndarray, shape (N,)
    #[pyclass]
    pub struct BallPit {
        world: World,
    }

    #[pymethods]
    impl BallPit {
        /// Create an empty arena.
        ///
        /// Parameters
        /// - width, height: arena size (floats, > 0)
        /// - restitution: (horizontal, vertical) wall coefficients in [0, 1]
        /// - wall_rule: "symmetric", "reference" (`<=` on the left wall) or
        ///   "approaching" (walls only reflect bodies moving toward them)
        /// - seed: RNG seed for populate/spawn_at; None for nondeterministic
        #[new]
        #[pyo3(signature = (width, height, restitution=(1.0, 1.0), wall_rule="symmetric", seed=None))]
        fn new(
            width: f64,
            height: f64,
            restitution: (f64, f64),
            wall_rule: &str,
            seed: Option<u64>,
        ) -> PyResult<Self> {
            let wall_rule = match wall_rule {
                "symmetric" => WallRule::Symmetric,
                "reference" => WallRule::ReferenceParity,
                "approaching" => WallRule::Approaching,
                other => return Err(py_err(format!("unknown wall_rule {other:?}"))),
            };
            let config = WorldConfig {
                restitution: [restitution.0, restitution.1],
                wall_rule,
                ..WorldConfig::default()
            };
            let world = World::with_config(width, height, config, seed).map_err(py_err)?;
            Ok(Self { world })
        }

        fn populate(&mut self, count: usize, radius: f64) -> PyResult<()> {
            self.world.populate(count, radius).map_err(py_err)
        }

        /// Append one body; returns its id.
        #[pyo3(signature = (x, y, vx, vy, radius, mass=1.0))]
        fn spawn(&mut self, x: f64, y: f64, vx: f64, vy: f64, radius: f64, mass: f64) -> PyResult<u32> {
            self.world.spawn([x, y], [vx, vy], radius, mass).map_err(py_err)
        }

        /// Spawn a randomly sized body at a pointer position; returns its id.
        fn spawn_at(&mut self, x: f64, y: f64) -> PyResult<u32> {
            self.world.spawn_at([x, y]).map_err(py_err)
        }

        fn reset(&mut self) {
            self.world.reset();
        }

        fn resize(&mut self, width: f64, height: f64) -> PyResult<()> {
            self.world.resize(width, height).map_err(py_err)
        }

        /// Advance by `ticks` ticks (releases the GIL during computation).
        #[pyo3(signature = (ticks=1))]
        fn step(&mut self, py: Python<'_>, ticks: u32) -> PyResult<()> {
            let world = &mut self.world;
            py.detach(|| {
                for _ in 0..ticks {
                    world.step()?;
                }
                Ok::<(), crate::error::Error>(())
            })
            .map_err(py_err)
        }

        /// Index of the body under the pointer, if any.
        fn particle_at(&self, x: f64, y: f64) -> Option<usize> {
            self.world.particle_at([x, y])
        }

        fn kinetic_energy(&self) -> f64 {
            self.world.kinetic_energy()
        }

        fn momentum(&self) -> (f64, f64) {
            let m = self.world.momentum();
            (m[0], m[1])
        }

        /// Return positions as a NumPy array of shape (N, 2), dtype=float64.
        fn get_positions<'py>(&self, py: Python<'py>) -> PyResult<Py<PyArray2<f64>>> {
            let n = self.world.num_particles();
            let mut arr = Array2::<f64>::zeros((n, DIM));
            for (i, p) in self.world.particles().iter().enumerate() {
                for k in 0..DIM {
                    arr[[i, k]] = p.r[k];
                }
            }
            Ok(arr.into_pyarray(py).to_owned().into())
        }

        /// Return velocities as a NumPy array of shape (N, 2), dtype=float64.
        fn get_velocities<'py>(&self, py: Python<'py>) -> PyResult<Py<PyArray2<f64>>> {
            let n = self.world.num_particles();
            let mut arr = Array2::<f64>::zeros((n, DIM));
            for (i, p) in self.world.particles().iter().enumerate() {
                for k in 0..DIM {
                    arr[[i, k]] = p.v[k];
                }
            }
            Ok(arr.into_pyarray(py).to_owned().into())
        }

        /// Return radii as a NumPy array of shape (N,), dtype=float64.
        fn get_radii<'py>(&self, py: Python<'py>) -> PyResult<Py<PyArray1<f64>>> {
            let radii: Array1<f64> = self.world.particles().iter().map(|p| p.radius()).collect();
            Ok(radii.into_pyarray(py).to_owned().into())
        }

        fn __len__(&self) -> usize {
            self.world.num_particles()
        }
    }

    /// The ballpit Python module entry point.
    #[pymodule]
    fn ballpit(_py: Python<'_>, m: &Bound<'_, PyModule>) -> PyResult<()> {
        m.add_class::<BallPit>()?;
        Ok(())
    }
}
