pub mod mock_querier;
