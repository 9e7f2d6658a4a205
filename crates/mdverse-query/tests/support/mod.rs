// SPDX-License-Identifier: Apache-2.0

use mdverse_query::{register_search_functions, REFERENCE_SCHEMA_SQL};
use rusqlite::Connection;

pub const SEED_SQL: &str = "
INSERT INTO dataset_origin(origin_id, name) VALUES (1, 'zenodo'), (2, 'osf'), (3, 'figshare');
INSERT INTO dataset(dataset_id, origin_id, id_in_origin, url, title, description, date_created, date_last_modified, file_number, download_number, view_number) VALUES
  (1, 1, '1001', 'https://zenodo.org/record/1001', 'Lipid bilayer membrane simulation', 'POPC membrane', '2019-03-01', '2019-04-01', 3, 10, 100),
  (2, 1, '1002', 'https://zenodo.org/record/1002', 'Protein folding trajectories', 'Villin headpiece', '2021-06-15', '2021-07-01', 2, 5, 50),
  (3, 2, 'abc12', 'https://osf.io/abc12', 'Water box 100% equilibrated', NULL, '2020-01-10', NULL, 1, NULL, NULL),
  (4, 3, '777', 'https://figshare.com/articles/777', 'DNA duplex in solvent', 'B-DNA', '2021-11-30', '2022-01-05', 0, 1, 2);
INSERT INTO author(author_id, name) VALUES (1, 'Smith J'), (2, 'Doe A');
INSERT INTO dataset_author_link(dataset_id, author_id) VALUES (1, 1), (1, 2);
INSERT INTO keyword(keyword_id, entry) VALUES (1, 'molecular dynamics'), (2, 'membrane');
INSERT INTO dataset_keyword_link(dataset_id, keyword_id) VALUES (1, 1), (1, 2);
INSERT INTO file_type(file_type_id, name) VALUES (1, 'gro'), (2, 'mdp'), (3, 'xtc'), (4, 'zip'), (5, 'txt');
INSERT INTO file(file_id, dataset_id, file_type_id, name, size_in_bytes, url, is_from_zip_file, parent_zip_file_id) VALUES
  (1, 1, 1, 'membrane.gro', 1000, 'https://zenodo.org/record/1001/files/membrane.gro', 0, NULL),
  (2, 1, 2, 'md.mdp', 500, 'https://zenodo.org/record/1001/files/md.mdp', 0, NULL),
  (3, 1, 3, 'traj.xtc', 2000000000, 'https://zenodo.org/record/1001/files/traj.xtc', 0, NULL),
  (4, 2, 4, 'archive.zip', 3000, 'https://zenodo.org/record/1002/files/archive.zip', 0, NULL),
  (5, 2, 1, 'protein.gro', 800, NULL, 1, 4),
  (6, 3, 5, 'readme.txt', 10, 'https://osf.io/abc12/readme.txt', 0, NULL);
INSERT INTO thermostat(thermostat_id, name) VALUES (1, 'V-rescale');
INSERT INTO barostat(barostat_id, name) VALUES (1, 'Parrinello-Rahman');
INSERT INTO integrator(integrator_id, name) VALUES (1, 'md');
INSERT INTO topology_file(file_id, atom_number, has_protein, has_nucleic, has_lipid, has_glucid, has_water_ion) VALUES
  (1, 12000, 0, 0, 1, 0, 1),
  (5, 600, 1, 0, 0, 0, 1);
INSERT INTO parameter_file(file_id, dt, nsteps, temperature, thermostat_id, barostat_id, integrator_id) VALUES
  (2, 0.002, 500000, 310.0, 1, 1, 1);
INSERT INTO trajectory_file(file_id, atom_number, frame_number) VALUES (3, 12000, 1001);
";

pub fn catalog() -> Connection {
    let conn = Connection::open_in_memory().expect("open memory db");
    conn.execute_batch(REFERENCE_SCHEMA_SQL).expect("schema");
    conn.execute_batch(SEED_SQL).expect("seed");
    register_search_functions(&conn).expect("search functions");
    conn
}
